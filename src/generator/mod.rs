//! The fragment generation pipeline.
//!
//! [`FragmentGenerator`] turns the Freedesktop SDK FFmpeg include document
//! and the base FFmpeg element document into one derived include fragment:
//!
//! 1. Dependency identifiers in the include document are junction-qualified.
//! 2. Variables that only exist to reference removed variables are pruned,
//!    and `conf-local` is scrubbed of flags that referenced them.
//! 3. Sections the consumer replaces (`sources`, `config`, `public.cpe`,
//!    `public.bst.split-rules`) are removed, collapsing `public` when it
//!    ends up empty.
//! 4. Dependencies the element appends through the `(>)` marker are merged
//!    in, junction-qualified, after the include-originated entries.
//! 5. Element variables are copied under the `fdo-` prefix, with the
//!    encoder/decoder lists and `conf-extra` cleaned of embedded `%{...}`
//!    references that the consumer wires up through separate variables.
//!
//! Embedded variable references are fixed, enumerable literal substrings of
//! the known schema (`,%{extra-encoders}`, ` --enable-encoder=%{encoders}`,
//! ...), so they are handled by plain substring removal rather than a
//! template engine.
//!
//! # Missing-key policy
//!
//! Required structure fails fast with a typed error naming the document and
//! key: `variables`, `build-depends`, and `depends` must exist in the
//! include document, and `variables` must exist in the element document.
//! Everything else is optional and tolerated when absent — pruned
//! variables, `conf-local`, `sources`, `public`, `config`, the element's
//! dependency sections and their `(>)` lists are all skipped with a debug
//! log when missing.

use crate::constants::{
    APPEND_MARKER, DEPENDENCY_KINDS, FDO_VARIABLE_PREFIX, PRUNED_VARIABLES,
    STRIPPED_CONF_PREFIXES,
};
use crate::core::IncludeGenError;
use crate::document::{store_document, LoadedDocument};
use serde_yaml::{Mapping, Value};
use std::path::Path;
use tracing::debug;

/// Role name used in errors for the first input file.
pub const INCLUDE_ROLE: &str = "include document";

/// Role name used in errors for the second input file.
pub const ELEMENT_ROLE: &str = "element document";

/// Generates the derived include fragment from the two source documents.
///
/// The generator holds only the junction name; each [`generate`] call is an
/// independent, deterministic transformation with no state carried between
/// runs.
///
/// [`generate`]: FragmentGenerator::generate
#[derive(Debug, Clone)]
pub struct FragmentGenerator {
    junction: String,
}

impl FragmentGenerator {
    /// Create a generator qualifying dependencies with `junction`.
    pub fn new(junction: impl Into<String>) -> Self {
        Self {
            junction: junction.into(),
        }
    }

    /// Run the full transformation and return the output mapping.
    ///
    /// This is a one-shot contract: the inputs must be fresh, unqualified
    /// documents. Feeding a previously generated fragment back in
    /// double-qualifies its dependencies; re-qualification is not detected.
    /// Given the same fresh inputs the output is byte-for-byte identical
    /// across runs.
    ///
    /// # Errors
    /// Returns [`IncludeGenError::MalformedInput`] when required structure
    /// is missing (see the module docs for the policy).
    pub fn generate(
        &self,
        mut include: LoadedDocument,
        element: &LoadedDocument,
    ) -> Result<Mapping, IncludeGenError> {
        self.qualify_dependencies(&mut include)?;
        prune_variables(&mut include)?;
        scrub_conf_local(&mut include)?;
        strip_replaced_sections(&mut include);
        self.merge_element_dependencies(&mut include, element)?;
        merge_element_variables(&mut include, element)?;
        Ok(include.mapping)
    }

    /// Rewrite every include-originated dependency to `"<junction>:<dep>"`.
    ///
    /// Both dependency sequences must be present; their absence means the
    /// upstream schema changed under us and the fragment would be useless.
    fn qualify_dependencies(&self, include: &mut LoadedDocument) -> Result<(), IncludeGenError> {
        for kind in DEPENDENCY_KINDS {
            let missing = include.malformed(kind);
            let deps = include
                .mapping
                .get_mut(*kind)
                .and_then(Value::as_sequence_mut)
                .ok_or(missing)?;

            for dep in deps.iter_mut() {
                if let Value::String(name) = dep {
                    let qualified = format!("{}:{name}", self.junction);
                    *name = qualified;
                } else {
                    // Mapping-form deps carry their own junction field
                    debug!("leaving non-string '{kind}' entry unqualified");
                }
            }
        }
        Ok(())
    }

    /// Append the element's `(>)` dependencies, junction-qualified, after
    /// the include-originated entries.
    fn merge_element_dependencies(
        &self,
        include: &mut LoadedDocument,
        element: &LoadedDocument,
    ) -> Result<(), IncludeGenError> {
        for kind in DEPENDENCY_KINDS {
            let Some(section) = element.mapping.get(*kind) else {
                debug!("element document has no '{kind}', skipping");
                continue;
            };

            let Some(appended) = section.get(APPEND_MARKER).and_then(Value::as_sequence) else {
                debug!("element '{kind}' carries no '{APPEND_MARKER}' list, skipping");
                continue;
            };

            let qualified: Vec<Value> = appended
                .iter()
                .filter_map(Value::as_str)
                .map(|dep| Value::String(format!("{}:{dep}", self.junction)))
                .collect();

            let missing = include.malformed(kind);
            let target = include
                .mapping
                .get_mut(*kind)
                .and_then(Value::as_sequence_mut)
                .ok_or(missing)?;
            target.extend(qualified);
        }
        Ok(())
    }
}

/// Borrow the include document's `variables` mapping, failing with a typed
/// error if it is absent or not a mapping.
fn variables_mut(doc: &mut LoadedDocument) -> Result<&mut Mapping, IncludeGenError> {
    let missing = doc.malformed("variables");
    doc.mapping
        .get_mut("variables")
        .and_then(Value::as_mapping_mut)
        .ok_or(missing)
}

/// Remove include variables that only referenced removed variables, plus the
/// schema's literal `(?)` placeholder key. Absent keys are tolerated.
fn prune_variables(include: &mut LoadedDocument) -> Result<(), IncludeGenError> {
    let vars = variables_mut(include)?;
    for name in PRUNED_VARIABLES {
        if vars.shift_remove(*name).is_none() {
            debug!("variable '{name}' absent from include document, nothing to prune");
        }
    }
    Ok(())
}

/// Drop `conf-local` tokens that reference removed variables and remove the
/// `conf-extra` placeholder slot.
///
/// Tokenization is on whitespace and the survivors are rejoined with single
/// spaces, so runs of whitespace in the original value are normalized.
fn scrub_conf_local(include: &mut LoadedDocument) -> Result<(), IncludeGenError> {
    let vars = variables_mut(include)?;

    if let Some(Value::String(conf_local)) = vars.get_mut("conf-local") {
        let kept: Vec<&str> = conf_local
            .split_whitespace()
            .filter(|token| !STRIPPED_CONF_PREFIXES.iter().any(|p| token.starts_with(p)))
            .collect();
        *conf_local = kept.join(" ");
    } else {
        debug!("include document has no 'conf-local' variable, skipping scrub");
    }

    vars.shift_remove("conf-extra");
    Ok(())
}

/// Remove the sections the consumer replaces outright: `sources`, `config`,
/// `public.cpe`, and `public.bst.split-rules`. If `public.bst` is left
/// empty it is removed, and if `public` is then empty it goes too.
fn strip_replaced_sections(include: &mut LoadedDocument) {
    include.mapping.shift_remove("sources");
    include.mapping.shift_remove("config");

    let remove_public = if let Some(public) = include
        .mapping
        .get_mut("public")
        .and_then(Value::as_mapping_mut)
    {
        public.shift_remove("cpe");

        if let Some(bst) = public.get_mut("bst").and_then(Value::as_mapping_mut) {
            bst.shift_remove("split-rules");
        }

        let bst_empty = public
            .get("bst")
            .and_then(Value::as_mapping)
            .is_some_and(Mapping::is_empty);
        if bst_empty {
            public.shift_remove("bst");
        }

        public.is_empty()
    } else {
        debug!("include document has no 'public' section, skipping strip");
        false
    };

    if remove_public {
        include.mapping.shift_remove("public");
    }
}

/// Copy the element's variables into the include document under the `fdo-`
/// prefix, merging `extra-*coders` into their parent lists and stripping
/// embedded `%{...}` references from the values the consumer rewires.
fn merge_element_variables(
    include: &mut LoadedDocument,
    element: &LoadedDocument,
) -> Result<(), IncludeGenError> {
    let missing = element.malformed("variables");
    let element_vars = element
        .mapping
        .get("variables")
        .and_then(Value::as_mapping)
        .ok_or(missing)?;

    let out_vars = variables_mut(include)?;

    for (key, value) in element_vars {
        let Some(name) = key.as_str() else {
            debug!("skipping non-string element variable key");
            continue;
        };

        // Already merged into the non-extra list below
        if name.starts_with("extra-") && name.ends_with("coders") {
            continue;
        }

        let merged = match value.as_str() {
            Some(text) => Value::String(transform_variable(name, text, element_vars)),
            // Non-string values pass through untouched
            None => value.clone(),
        };

        out_vars.insert(
            Value::String(format!("{FDO_VARIABLE_PREFIX}{name}")),
            merged,
        );
    }
    Ok(())
}

/// Apply the per-variable value transformations for the merge.
///
/// `encoders`/`decoders` lose their `,%{extra-<name>}` reference and gain
/// the actual `extra-<name>` value when it is non-empty; `conf-extra` loses
/// the encoder/decoder enable flags that the consumer re-adds through the
/// dedicated `fdo-encoders`/`fdo-decoders` variables.
fn transform_variable(name: &str, value: &str, element_vars: &Mapping) -> String {
    let mut value = value.to_string();

    if name == "encoders" || name == "decoders" {
        let extra_name = format!("extra-{name}");
        value = value.replace(&format!(",%{{{extra_name}}}"), "");

        if let Some(extra) = element_vars.get(extra_name.as_str()).and_then(Value::as_str) {
            if !extra.is_empty() {
                value.push(',');
                value.push_str(extra);
            }
        }
    }

    if name == "conf-extra" {
        value = value
            .replace(" --enable-encoder=%{encoders}", "")
            .replace(" --enable-decoder=%{decoders}", "");
    }

    value
}

/// Load both documents, run the transformation, and write the fragment.
///
/// The output file is only created once the whole transformation has
/// succeeded; any failure leaves the destination untouched.
///
/// # Errors
/// Propagates [`IncludeGenError::MissingInput`] for unreadable inputs,
/// [`IncludeGenError::MalformedInput`]/[`IncludeGenError::YamlParse`] for
/// broken documents, and [`IncludeGenError::WriteFailed`] for an unwritable
/// destination.
pub fn generate_file(
    include_path: &Path,
    element_path: &Path,
    out_path: &Path,
    junction: &str,
) -> Result<(), IncludeGenError> {
    let include = LoadedDocument::load(include_path, INCLUDE_ROLE)?;
    let element = LoadedDocument::load(element_path, ELEMENT_ROLE)?;

    let generator = FragmentGenerator::new(junction);
    let output = generator.generate(include, &element)?;

    store_document(out_path, &output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JUNCTION: &str = "freedesktop-sdk.bst";

    fn include_doc(yaml: &str) -> LoadedDocument {
        LoadedDocument::from_str(yaml, INCLUDE_ROLE, "elements/include/ffmpeg.yml").unwrap()
    }

    fn element_doc(yaml: &str) -> LoadedDocument {
        LoadedDocument::from_str(yaml, ELEMENT_ROLE, "elements/components/ffmpeg.bst").unwrap()
    }

    fn sample_include() -> LoadedDocument {
        include_doc(
            r#"
build-depends:
- public-stacks/buildsystem-autotools.bst
- components/nasm.bst
depends:
- bootstrap-import.bst
- components/zlib.bst
variables:
  ffmpeg-prefix: "%{prefix}"
  ffmpeg-libdir: "%{libdir}"
  ffmpeg-arch: "%{arch}"
  "(?)": placeholder
  conf-local: >-
    --prefix="%{ffmpeg-prefix}"
    --libdir="%{ffmpeg-libdir}"
    --arch="%{ffmpeg-arch}"
    --disable-static
    --enable-shared
  conf-extra: ''
public:
  bst:
    split-rules:
      devel:
      - "%{libdir}/libav*.so"
  cpe:
    product: ffmpeg
sources:
- kind: git_repo
  url: https://git.ffmpeg.org/ffmpeg.git
config:
  configure-commands:
  - "%{conf-local} %{conf-extra}"
"#,
        )
    }

    fn sample_element() -> LoadedDocument {
        element_doc(
            r#"
build-depends:
  (>):
  - components/libx264.bst
depends:
  (>):
  - components/libvpx.bst
  - components/opus.bst
variables:
  encoders: aac,h264,%{extra-encoders}
  decoders: aac,h264,%{extra-decoders}
  extra-encoders: vp9
  extra-decoders: ''
  conf-extra: --enable-gpl --enable-encoder=%{encoders} --enable-libx264 --enable-decoder=%{decoders}
  license: GPLv2+
"#,
        )
    }

    fn variables(output: &Mapping) -> &Mapping {
        output.get("variables").unwrap().as_mapping().unwrap()
    }

    fn sequence_of_strings(output: &Mapping, key: &str) -> Vec<String> {
        output
            .get(key)
            .unwrap()
            .as_sequence()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_dependencies_are_junction_qualified_once() {
        let generator = FragmentGenerator::new(JUNCTION);
        let output = generator.generate(sample_include(), &sample_element()).unwrap();

        let build_depends = sequence_of_strings(&output, "build-depends");
        assert_eq!(
            build_depends[0],
            "freedesktop-sdk.bst:public-stacks/buildsystem-autotools.bst"
        );
        assert_eq!(build_depends[1], "freedesktop-sdk.bst:components/nasm.bst");
        // No double qualification within a single run
        assert!(!build_depends[0].contains("freedesktop-sdk.bst:freedesktop-sdk.bst:"));
    }

    #[test]
    fn test_element_dependencies_appended_after_include_entries() {
        let generator = FragmentGenerator::new(JUNCTION);
        let output = generator.generate(sample_include(), &sample_element()).unwrap();

        let build_depends = sequence_of_strings(&output, "build-depends");
        assert_eq!(
            build_depends.last().unwrap(),
            "freedesktop-sdk.bst:components/libx264.bst"
        );

        let depends = sequence_of_strings(&output, "depends");
        assert_eq!(
            depends,
            vec![
                "freedesktop-sdk.bst:bootstrap-import.bst",
                "freedesktop-sdk.bst:components/zlib.bst",
                "freedesktop-sdk.bst:components/libvpx.bst",
                "freedesktop-sdk.bst:components/opus.bst",
            ]
        );
    }

    #[test]
    fn test_pruned_variables_never_survive() {
        let generator = FragmentGenerator::new(JUNCTION);
        let output = generator.generate(sample_include(), &sample_element()).unwrap();

        let vars = variables(&output);
        for name in ["ffmpeg-prefix", "ffmpeg-libdir", "ffmpeg-arch", "(?)", "conf-extra"] {
            assert!(!vars.contains_key(name), "'{name}' must be pruned");
        }
    }

    #[test]
    fn test_pruning_tolerates_absent_variables() {
        let include = include_doc(
            "build-depends: []\ndepends: []\nvariables:\n  conf-local: --disable-static\n",
        );
        let element = element_doc("variables: {}\n");

        let generator = FragmentGenerator::new(JUNCTION);
        let output = generator.generate(include, &element).unwrap();
        assert_eq!(
            variables(&output).get("conf-local").unwrap().as_str().unwrap(),
            "--disable-static"
        );
    }

    #[test]
    fn test_conf_local_scrubbed_of_removed_variable_flags() {
        let generator = FragmentGenerator::new(JUNCTION);
        let output = generator.generate(sample_include(), &sample_element()).unwrap();

        let conf_local = variables(&output).get("conf-local").unwrap().as_str().unwrap();
        assert_eq!(conf_local, "--disable-static --enable-shared");
        for token in conf_local.split_whitespace() {
            assert!(!token.starts_with("--prefix"));
            assert!(!token.starts_with("--libdir"));
            assert!(!token.starts_with("--arch"));
        }
    }

    #[test]
    fn test_replaced_sections_removed_and_public_collapsed() {
        let generator = FragmentGenerator::new(JUNCTION);
        let output = generator.generate(sample_include(), &sample_element()).unwrap();

        assert!(!output.contains_key("sources"));
        assert!(!output.contains_key("config"));
        // cpe and split-rules were the only public content, so the whole
        // section collapses away
        assert!(!output.contains_key("public"));
    }

    #[test]
    fn test_public_kept_when_other_keys_remain() {
        let include = include_doc(
            r#"
build-depends: []
depends: []
variables: {}
public:
  bst:
    split-rules: {}
  integration-commands:
  - ldconfig
"#,
        );
        let element = element_doc("variables: {}\n");

        let generator = FragmentGenerator::new(JUNCTION);
        let output = generator.generate(include, &element).unwrap();

        let public = output.get("public").unwrap().as_mapping().unwrap();
        assert!(!public.contains_key("bst"));
        assert!(public.contains_key("integration-commands"));
    }

    #[test]
    fn test_encoders_merge_extra_when_non_empty() {
        let generator = FragmentGenerator::new(JUNCTION);
        let output = generator.generate(sample_include(), &sample_element()).unwrap();

        let vars = variables(&output);
        assert_eq!(
            vars.get("fdo-encoders").unwrap().as_str().unwrap(),
            "aac,h264,vp9"
        );
    }

    #[test]
    fn test_decoders_drop_reference_when_extra_empty() {
        let generator = FragmentGenerator::new(JUNCTION);
        let output = generator.generate(sample_include(), &sample_element()).unwrap();

        let vars = variables(&output);
        assert_eq!(
            vars.get("fdo-decoders").unwrap().as_str().unwrap(),
            "aac,h264"
        );
    }

    #[test]
    fn test_extra_coders_not_copied_independently() {
        let generator = FragmentGenerator::new(JUNCTION);
        let output = generator.generate(sample_include(), &sample_element()).unwrap();

        let vars = variables(&output);
        assert!(!vars.contains_key("fdo-extra-encoders"));
        assert!(!vars.contains_key("fdo-extra-decoders"));
    }

    #[test]
    fn test_conf_extra_loses_encoder_decoder_references() {
        let generator = FragmentGenerator::new(JUNCTION);
        let output = generator.generate(sample_include(), &sample_element()).unwrap();

        let vars = variables(&output);
        assert_eq!(
            vars.get("fdo-conf-extra").unwrap().as_str().unwrap(),
            "--enable-gpl --enable-libx264"
        );
    }

    #[test]
    fn test_plain_element_variables_copied_verbatim_under_prefix() {
        let generator = FragmentGenerator::new(JUNCTION);
        let output = generator.generate(sample_include(), &sample_element()).unwrap();

        let vars = variables(&output);
        assert_eq!(vars.get("fdo-license").unwrap().as_str().unwrap(), "GPLv2+");
        // Originals are never overwritten, only fdo-prefixed copies land
        assert!(!vars.contains_key("license"));
    }

    #[test]
    fn test_element_without_dependency_sections_is_fine() {
        let include = include_doc("build-depends: []\ndepends: []\nvariables: {}\n");
        let element = element_doc("variables:\n  license: MIT\n");

        let generator = FragmentGenerator::new(JUNCTION);
        let output = generator.generate(include, &element).unwrap();
        assert_eq!(
            variables(&output).get("fdo-license").unwrap().as_str().unwrap(),
            "MIT"
        );
    }

    #[test]
    fn test_missing_include_depends_is_malformed() {
        let include = include_doc("build-depends: []\nvariables: {}\n");
        let element = element_doc("variables: {}\n");

        let generator = FragmentGenerator::new(JUNCTION);
        let err = generator.generate(include, &element).unwrap_err();
        match err {
            IncludeGenError::MalformedInput { key, role, .. } => {
                assert_eq!(key, "depends");
                assert_eq!(role, INCLUDE_ROLE);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_element_variables_is_malformed() {
        let include = include_doc("build-depends: []\ndepends: []\nvariables: {}\n");
        let element = element_doc("build-depends:\n  (>):\n  - components/x.bst\n");

        let generator = FragmentGenerator::new(JUNCTION);
        let err = generator.generate(include, &element).unwrap_err();
        match err {
            IncludeGenError::MalformedInput { key, role, .. } => {
                assert_eq!(key, "variables");
                assert_eq!(role, ELEMENT_ROLE);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_custom_junction_name() {
        let include = include_doc("build-depends:\n- a.bst\ndepends: []\nvariables: {}\n");
        let element = element_doc("variables: {}\n");

        let generator = FragmentGenerator::new("other-sdk.bst");
        let output = generator.generate(include, &element).unwrap();
        assert_eq!(
            sequence_of_strings(&output, "build-depends"),
            vec!["other-sdk.bst:a.bst"]
        );
    }

    #[test]
    fn test_generation_is_deterministic() {
        let generator = FragmentGenerator::new(JUNCTION);
        let first = generator.generate(sample_include(), &sample_element()).unwrap();
        let second = generator.generate(sample_include(), &sample_element()).unwrap();

        assert_eq!(
            serde_yaml::to_string(&first).unwrap(),
            serde_yaml::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_top_level_key_order_preserved() {
        let generator = FragmentGenerator::new(JUNCTION);
        let output = generator.generate(sample_include(), &sample_element()).unwrap();

        let keys: Vec<&str> = output.keys().map(|k| k.as_str().unwrap()).collect();
        assert_eq!(keys, vec!["build-depends", "depends", "variables"]);
    }
}
