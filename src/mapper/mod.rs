// src/mapper/mod.rs

//! Legacy tree to modern tree translation
//!
//! Walks a parsed [`LegacyNode`] tree and produces the modern
//! document, driven entirely by the catalog in [`table`]: every tag is
//! classified as translate, drop-silent, drop-with-warning, or fatal,
//! with no default for unknown tags. Numeric fields are decoded from
//! their legacy encodings to canonical text, child order is preserved
//! exactly, and every block reference is confirmed through the
//! [`BlockResolver`] before the tree is accepted. The mapper's only
//! side effects are read-only resolver lookups.

mod table;

pub use table::{Disposition, TAG_CATALOG, disposition};

use thiserror::Error;
use tracing::{debug, warn};

use crate::blockfile::BlockResolver;
use crate::legacy::LegacyNode;
use crate::xml::ModernNode;
use table::AttrSpec;

/// Format version stamped into converted documents.
pub const MODERN_VERSION: &str = "1.3.0";

/// Translation-level failure. The input file is never modified.
#[derive(Debug, Error)]
pub enum SemanticError {
    /// A tag the catalog does not know at all.
    #[error("line {line}: unknown legacy tag '{tag}'")]
    UnknownTag { tag: String, line: usize },

    /// A required attribute is absent.
    #[error("line {line}: '{tag}' is missing its '{attribute}' attribute")]
    MissingAttribute {
        tag: String,
        attribute: String,
        line: usize,
    },

    /// An attribute value that does not decode or is out of range.
    #[error("line {line}: attribute '{attribute}' of '{tag}' is {reason} (value {value:?})")]
    ValueOutOfRange {
        tag: String,
        attribute: String,
        value: String,
        reason: String,
        line: usize,
    },

    /// A block or alias reference the resolver cannot satisfy.
    #[error("unresolvable block reference '{reference}'")]
    UnresolvableBlock { reference: String },

    /// Nodes arranged in a way the format does not allow.
    #[error("line {line}: {detail}")]
    StructuralInconsistency { detail: String, line: usize },

    /// A tag the catalog marks fatal-if-present.
    #[error("line {line}: '{tag}' cannot be converted: {detail}")]
    FatalTag {
        tag: String,
        detail: String,
        line: usize,
    },
}

/// Result of mapping one legacy tree.
#[derive(Debug)]
pub struct MappedDocument {
    pub root: ModernNode,
    /// One entry per dropped element or attribute worth surfacing.
    pub warnings: Vec<String>,
    pub tracks: usize,
    pub clips: usize,
    pub blocks: usize,
}

/// Translate a validated legacy tree into the modern document.
pub fn map_document(
    root: &LegacyNode,
    resolver: &dyn BlockResolver,
) -> Result<MappedDocument, SemanticError> {
    if root.tag != "project" {
        return Err(SemanticError::StructuralInconsistency {
            detail: format!("document root must be 'project', found '{}'", root.tag),
            line: root.line,
        });
    }

    let mut mapper = Mapper {
        resolver,
        warnings: Vec::new(),
        tracks: 0,
        clips: 0,
        blocks: 0,
    };
    let modern_root = mapper.map_project(root)?;
    debug!(
        tracks = mapper.tracks,
        clips = mapper.clips,
        blocks = mapper.blocks,
        warnings = mapper.warnings.len(),
        "mapped legacy project"
    );
    Ok(MappedDocument {
        root: modern_root,
        warnings: mapper.warnings,
        tracks: mapper.tracks,
        clips: mapper.clips,
        blocks: mapper.blocks,
    })
}

/// Where in the tree a node is being mapped; gates which translated
/// tags are legal as children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Project,
    WaveTrack,
    LabelTrack,
    TimeTrack,
    Clip,
    Envelope,
    /// Nodes that admit no translated children at all.
    Leaf,
}

fn allowed_in(tag: &str, ctx: Context) -> bool {
    matches!(
        (tag, ctx),
        ("wavetrack" | "labeltrack" | "timetrack", Context::Project)
            | ("clip", Context::WaveTrack)
            | ("block" | "alias", Context::Clip)
            | (
                "envelope",
                Context::WaveTrack | Context::TimeTrack | Context::Clip
            )
            | ("point", Context::Envelope)
            | ("label", Context::LabelTrack)
    )
}

/// Decoded attributes of one legacy node.
struct TranslatedAttrs {
    /// (modern name, canonical value) pairs ready for emission.
    emit: Vec<(&'static str, String)>,
    /// Canonical values keyed by legacy name, including ones the
    /// mapper redistributes or only cross-checks.
    values: Vec<(&'static str, String)>,
}

impl TranslatedAttrs {
    fn value(&self, legacy: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| *n == legacy)
            .map(|(_, v)| v.as_str())
    }

    fn required(&self, node: &LegacyNode, legacy: &'static str) -> Result<&str, SemanticError> {
        self.value(legacy).ok_or_else(|| SemanticError::MissingAttribute {
            tag: node.tag.clone(),
            attribute: legacy.to_string(),
            line: node.line,
        })
    }
}

struct Mapper<'a> {
    resolver: &'a dyn BlockResolver,
    warnings: Vec<String>,
    tracks: usize,
    clips: usize,
    blocks: usize,
}

impl Mapper<'_> {
    fn warn(&mut self, message: String) {
        warn!("{message}");
        self.warnings.push(message);
    }

    fn translate_attrs(&mut self, node: &LegacyNode) -> Result<TranslatedAttrs, SemanticError> {
        let specs: &[AttrSpec] = table::attr_specs(&node.tag);
        let mut out = TranslatedAttrs {
            emit: Vec::new(),
            values: Vec::new(),
        };

        for spec in specs {
            match node.attr(spec.legacy) {
                Some(raw) => {
                    let canonical = table::decode_value(spec.kind, raw).map_err(|reason| {
                        SemanticError::ValueOutOfRange {
                            tag: node.tag.clone(),
                            attribute: spec.legacy.to_string(),
                            value: raw.to_string(),
                            reason,
                            line: node.line,
                        }
                    })?;
                    if let Some(modern) = spec.modern {
                        out.emit.push((modern, canonical.clone()));
                    }
                    out.values.push((spec.legacy, canonical));
                }
                None if spec.required => {
                    return Err(SemanticError::MissingAttribute {
                        tag: node.tag.clone(),
                        attribute: spec.legacy.to_string(),
                        line: node.line,
                    });
                }
                None => {}
            }
        }

        // Attributes the catalog does not list are obsolete metadata:
        // kept out of the modern document, surfaced once.
        for (name, _) in &node.attributes {
            if !specs.iter().any(|spec| spec.legacy == name) {
                self.warn(format!(
                    "dropped unknown attribute '{}' of '{}' (line {})",
                    name, node.tag, node.line
                ));
            }
        }

        Ok(out)
    }

    /// Build the modern node for a simple tag: translated attributes,
    /// no redistribution.
    fn build_simple(
        &mut self,
        node: &LegacyNode,
        modern_tag: &'static str,
    ) -> Result<(ModernNode, TranslatedAttrs), SemanticError> {
        let attrs = self.translate_attrs(node)?;
        let mut out = ModernNode::new(modern_tag);
        for (name, value) in &attrs.emit {
            out.push_attr(name, value.clone());
        }
        Ok((out, attrs))
    }

    fn map_children(
        &mut self,
        parent: &LegacyNode,
        ctx: Context,
        out: &mut ModernNode,
    ) -> Result<(), SemanticError> {
        for child in &parent.children {
            let Some(disposition) = table::disposition(&child.tag) else {
                return Err(SemanticError::UnknownTag {
                    tag: child.tag.clone(),
                    line: child.line,
                });
            };

            match disposition {
                Disposition::DropSilent => {
                    debug!(tag = %child.tag, line = child.line, "skipped obsolete tag");
                }
                Disposition::DropWarn => {
                    self.warn(format!("dropped obsolete '{}' (line {})", child.tag, child.line));
                }
                Disposition::Fatal { reason } => {
                    return Err(SemanticError::FatalTag {
                        tag: child.tag.clone(),
                        detail: reason.to_string(),
                        line: child.line,
                    });
                }
                Disposition::Translate { modern_tag } => {
                    if !allowed_in(&child.tag, ctx) {
                        return Err(SemanticError::StructuralInconsistency {
                            detail: format!(
                                "'{}' cannot appear inside '{}'",
                                child.tag, parent.tag
                            ),
                            line: child.line,
                        });
                    }
                    let mapped = self.map_translated(child, modern_tag)?;
                    out.push_child(mapped);
                }
            }
        }
        Ok(())
    }

    fn map_translated(
        &mut self,
        node: &LegacyNode,
        modern_tag: &'static str,
    ) -> Result<ModernNode, SemanticError> {
        match node.tag.as_str() {
            "wavetrack" => self.map_wavetrack(node, modern_tag),
            "labeltrack" => self.map_labeltrack(node, modern_tag),
            "timetrack" => self.map_timetrack(node, modern_tag),
            "clip" => self.map_clip(node, modern_tag),
            "block" => self.map_block(node, modern_tag),
            "alias" => self.map_alias(node, modern_tag),
            "envelope" => self.map_envelope(node, modern_tag),
            "point" | "label" => self.map_leaf(node, modern_tag),
            other => Err(SemanticError::StructuralInconsistency {
                detail: format!("'{other}' cannot appear here"),
                line: node.line,
            }),
        }
    }

    fn map_project(&mut self, node: &LegacyNode) -> Result<ModernNode, SemanticError> {
        let attrs = self.translate_attrs(node)?;
        let mut project = ModernNode::new("project");
        project.push_attr("version", MODERN_VERSION);
        for (name, value) in &attrs.emit {
            project.push_attr(name, value.clone());
        }
        self.map_children(node, Context::Project, &mut project)?;
        Ok(project)
    }

    fn map_wavetrack(
        &mut self,
        node: &LegacyNode,
        modern_tag: &'static str,
    ) -> Result<ModernNode, SemanticError> {
        let (mut track, _attrs) = self.build_simple(node, modern_tag)?;
        self.map_children(node, Context::WaveTrack, &mut track)?;
        self.tracks += 1;
        Ok(track)
    }

    fn map_labeltrack(
        &mut self,
        node: &LegacyNode,
        modern_tag: &'static str,
    ) -> Result<ModernNode, SemanticError> {
        let (mut track, attrs) = self.build_simple(node, modern_tag)?;
        self.map_children(node, Context::LabelTrack, &mut track)?;
        if let Some(declared) = attrs.value("numLabels") {
            let actual = track.children.iter().filter(|c| c.tag == "label").count();
            if declared != actual.to_string() {
                return Err(SemanticError::StructuralInconsistency {
                    detail: format!(
                        "'labeltrack' declares {declared} labels but contains {actual}"
                    ),
                    line: node.line,
                });
            }
        }
        self.tracks += 1;
        Ok(track)
    }

    fn map_timetrack(
        &mut self,
        node: &LegacyNode,
        modern_tag: &'static str,
    ) -> Result<ModernNode, SemanticError> {
        let (mut track, _attrs) = self.build_simple(node, modern_tag)?;
        self.map_children(node, Context::TimeTrack, &mut track)?;
        self.tracks += 1;
        Ok(track)
    }

    fn map_clip(
        &mut self,
        node: &LegacyNode,
        modern_tag: &'static str,
    ) -> Result<ModernNode, SemanticError> {
        let (mut clip, attrs) = self.build_simple(node, modern_tag)?;
        self.map_children(node, Context::Clip, &mut clip)?;
        if let Some(declared) = attrs.value("numBlocks") {
            let actual = clip.children.iter().filter(|c| c.tag == "waveblock").count();
            if declared != actual.to_string() {
                return Err(SemanticError::StructuralInconsistency {
                    detail: format!("'clip' declares {declared} blocks but contains {actual}"),
                    line: node.line,
                });
            }
        }
        self.clips += 1;
        Ok(clip)
    }

    /// A legacy block expands into a waveblock wrapping a blockfile
    /// reference; the reference must resolve before it is accepted.
    fn map_block(
        &mut self,
        node: &LegacyNode,
        modern_tag: &'static str,
    ) -> Result<ModernNode, SemanticError> {
        let attrs = self.translate_attrs(node)?;
        let file_id = attrs.required(node, "file")?;
        if self.resolver.resolve(file_id).is_none() {
            return Err(SemanticError::UnresolvableBlock {
                reference: file_id.to_string(),
            });
        }

        let mut waveblock = ModernNode::new(modern_tag);
        waveblock.push_attr("start", attrs.required(node, "start")?);
        self.map_children(node, Context::Leaf, &mut waveblock)?;

        let mut blockfile = ModernNode::new("blockfile");
        blockfile.push_attr("name", file_id);
        blockfile.push_attr("len", attrs.required(node, "len")?);
        waveblock.push_child(blockfile);

        self.blocks += 1;
        Ok(waveblock)
    }

    /// An alias block references samples inside an external audio
    /// file; the target must exist, but the path is emitted as the
    /// legacy file spelled it.
    fn map_alias(
        &mut self,
        node: &LegacyNode,
        modern_tag: &'static str,
    ) -> Result<ModernNode, SemanticError> {
        let attrs = self.translate_attrs(node)?;
        let path = attrs.required(node, "path")?;
        if self.resolver.resolve_alias(path).is_none() {
            return Err(SemanticError::UnresolvableBlock {
                reference: path.to_string(),
            });
        }

        let mut waveblock = ModernNode::new("waveblock");
        waveblock.push_attr("start", attrs.required(node, "start")?);
        self.map_children(node, Context::Leaf, &mut waveblock)?;

        let mut aliasfile = ModernNode::new(modern_tag);
        aliasfile.push_attr("aliaspath", path);
        aliasfile.push_attr("aliasstart", attrs.required(node, "aliasstart")?);
        aliasfile.push_attr("aliaslen", attrs.required(node, "len")?);
        aliasfile.push_attr("aliaschannel", attrs.value("channel").unwrap_or("0"));
        waveblock.push_child(aliasfile);

        self.blocks += 1;
        Ok(waveblock)
    }

    fn map_envelope(
        &mut self,
        node: &LegacyNode,
        modern_tag: &'static str,
    ) -> Result<ModernNode, SemanticError> {
        let (mut envelope, attrs) = self.build_simple(node, modern_tag)?;
        self.map_children(node, Context::Envelope, &mut envelope)?;
        let declared = attrs.required(node, "numPoints")?;
        let actual = envelope
            .children
            .iter()
            .filter(|c| c.tag == "controlpoint")
            .count();
        if declared != actual.to_string() {
            return Err(SemanticError::StructuralInconsistency {
                detail: format!("'envelope' declares {declared} points but contains {actual}"),
                line: node.line,
            });
        }
        Ok(envelope)
    }

    fn map_leaf(
        &mut self,
        node: &LegacyNode,
        modern_tag: &'static str,
    ) -> Result<ModernNode, SemanticError> {
        let (mut out, _attrs) = self.build_simple(node, modern_tag)?;
        self.map_children(node, Context::Leaf, &mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::parse_document;
    use std::path::PathBuf;

    /// Resolver backed by fixed id/alias lists.
    struct StaticResolver {
        blocks: Vec<&'static str>,
        aliases: Vec<&'static str>,
    }

    impl StaticResolver {
        fn with_blocks(blocks: &[&'static str]) -> Self {
            Self {
                blocks: blocks.to_vec(),
                aliases: Vec::new(),
            }
        }
    }

    impl BlockResolver for StaticResolver {
        fn resolve(&self, file_id: &str) -> Option<PathBuf> {
            self.blocks
                .iter()
                .any(|b| *b == file_id)
                .then(|| PathBuf::from(file_id))
        }

        fn resolve_alias(&self, path: &str) -> Option<PathBuf> {
            self.aliases
                .iter()
                .any(|a| *a == path)
                .then(|| PathBuf::from(path))
        }
    }

    fn map(input: &str, resolver: &StaticResolver) -> Result<MappedDocument, SemanticError> {
        let root = parse_document(input).unwrap();
        map_document(&root, resolver)
    }

    const HEADER: &str = "project\nversion\t0.95\nprojName\tdemo\nrate\t44100\n";

    fn project(body: &str) -> String {
        format!("{HEADER}{body}end project\n")
    }

    #[test]
    fn maps_minimal_project() {
        let doc = map(&project(""), &StaticResolver::with_blocks(&[])).unwrap();
        assert_eq!(doc.root.tag, "project");
        assert_eq!(doc.root.attr("version"), Some(MODERN_VERSION));
        assert_eq!(doc.root.attr("projname"), Some("demo"));
        assert_eq!(doc.root.attr("rate"), Some("44100"));
        assert_eq!(doc.tracks, 0);
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn maps_track_clip_and_block() {
        let body = "wavetrack\nname\tvocals\nchannel\t0\nrate\t44100\nclip\noffset\t0.0\nformat\t131073\nblock\nfile\tblock001\nstart\t000000000000\nlen\t262144\nend block\nend clip\nend wavetrack\n";
        let doc = map(&project(body), &StaticResolver::with_blocks(&["block001"])).unwrap();

        assert_eq!((doc.tracks, doc.clips, doc.blocks), (1, 1, 1));
        let track = &doc.root.children[0];
        assert_eq!(track.tag, "wavetrack");
        let clip = &track.children[0];
        assert_eq!(clip.tag, "waveclip");
        assert_eq!(clip.attr("format"), Some("int16"));
        let waveblock = &clip.children[0];
        assert_eq!(waveblock.tag, "waveblock");
        // Legacy zero padding is gone from the canonical value.
        assert_eq!(waveblock.attr("start"), Some("0"));
        let blockfile = &waveblock.children[0];
        assert_eq!(blockfile.tag, "blockfile");
        assert_eq!(blockfile.attr("name"), Some("block001"));
        assert_eq!(blockfile.attr("len"), Some("262144"));
    }

    #[test]
    fn preserves_clip_order() {
        let body = "wavetrack\nname\tvocals\nchannel\t0\nrate\t44100\nclip\noffset\t0.0\nformat\t131073\nend clip\nclip\noffset\t7,5\nformat\t262159\nend clip\nend wavetrack\n";
        let doc = map(&project(body), &StaticResolver::with_blocks(&[])).unwrap();
        let track = &doc.root.children[0];
        assert_eq!(track.children.len(), 2);
        assert_eq!(track.children[0].attr("offset"), Some("0"));
        // Comma separator normalized.
        assert_eq!(track.children[1].attr("offset"), Some("7.5"));
        assert_eq!(track.children[1].attr("format"), Some("float32"));
    }

    #[test]
    fn unresolvable_block_names_the_reference() {
        let body = "wavetrack\nname\tv\nchannel\t0\nrate\t44100\nclip\noffset\t0\nformat\t131073\nblock\nfile\tblock007\nstart\t0\nlen\t1\nend block\nend clip\nend wavetrack\n";
        let err = map(&project(body), &StaticResolver::with_blocks(&[])).unwrap_err();
        match err {
            SemanticError::UnresolvableBlock { reference } => assert_eq!(reference, "block007"),
            other => panic!("expected UnresolvableBlock, got {other:?}"),
        }
    }

    #[test]
    fn alias_block_maps_and_validates_target() {
        let body = "wavetrack\nname\tv\nchannel\t0\nrate\t44100\nclip\noffset\t0\nformat\t131073\nalias\nstart\t0\npath\ttake3.wav\naliasstart\t44100\nlen\t88200\nend alias\nend clip\nend wavetrack\n";
        let mut resolver = StaticResolver::with_blocks(&[]);
        resolver.aliases.push("take3.wav");

        let doc = map(&project(body), &resolver).unwrap();
        let aliasfile = &doc.root.children[0].children[0].children[0].children[0];
        assert_eq!(aliasfile.tag, "aliasblockfile");
        assert_eq!(aliasfile.attr("aliaspath"), Some("take3.wav"));
        assert_eq!(aliasfile.attr("aliasstart"), Some("44100"));
        assert_eq!(aliasfile.attr("aliaslen"), Some("88200"));
        assert_eq!(aliasfile.attr("aliaschannel"), Some("0"));

        let err = map(&project(body), &StaticResolver::with_blocks(&[])).unwrap_err();
        match err {
            SemanticError::UnresolvableBlock { reference } => assert_eq!(reference, "take3.wav"),
            other => panic!("expected UnresolvableBlock, got {other:?}"),
        }
    }

    #[test]
    fn unknown_tag_is_fatal() {
        let err = map(
            &project("sequence\nend sequence\n"),
            &StaticResolver::with_blocks(&[]),
        )
        .unwrap_err();
        assert!(matches!(err, SemanticError::UnknownTag { .. }));
    }

    #[test]
    fn out_of_range_channel_rejected() {
        let body = "wavetrack\nname\tv\nchannel\t7\nrate\t44100\nend wavetrack\n";
        let err = map(&project(body), &StaticResolver::with_blocks(&[])).unwrap_err();
        match err {
            SemanticError::ValueOutOfRange { attribute, value, .. } => {
                assert_eq!(attribute, "channel");
                assert_eq!(value, "7");
            }
            other => panic!("expected ValueOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn missing_required_attribute_rejected() {
        let body = "wavetrack\nname\tv\nrate\t44100\nend wavetrack\n";
        let err = map(&project(body), &StaticResolver::with_blocks(&[])).unwrap_err();
        match err {
            SemanticError::MissingAttribute { tag, attribute, .. } => {
                assert_eq!(tag, "wavetrack");
                assert_eq!(attribute, "channel");
            }
            other => panic!("expected MissingAttribute, got {other:?}"),
        }
    }

    #[test]
    fn misplaced_nodes_are_structural_errors() {
        // A label outside any labeltrack.
        let err = map(
            &project("label\nt\t1.0\ntitle\tverse\nend label\n"),
            &StaticResolver::with_blocks(&[]),
        )
        .unwrap_err();
        assert!(matches!(err, SemanticError::StructuralInconsistency { .. }));

        // A clip directly under the project.
        let err = map(
            &project("clip\noffset\t0\nformat\t131073\nend clip\n"),
            &StaticResolver::with_blocks(&[]),
        )
        .unwrap_err();
        assert!(matches!(err, SemanticError::StructuralInconsistency { .. }));
    }

    #[test]
    fn envelope_point_count_is_cross_checked() {
        let ok = "wavetrack\nname\tv\nchannel\t0\nrate\t44100\nenvelope\nnumPoints\t2\npoint\nt\t0.0\nval\t1.0\nend point\npoint\nt\t1.0\nval\t0.5\nend point\nend envelope\nend wavetrack\n";
        let doc = map(&project(ok), &StaticResolver::with_blocks(&[])).unwrap();
        let envelope = &doc.root.children[0].children[0];
        assert_eq!(envelope.attr("numpoints"), Some("2"));
        assert_eq!(envelope.children.len(), 2);

        let bad = "wavetrack\nname\tv\nchannel\t0\nrate\t44100\nenvelope\nnumPoints\t3\npoint\nt\t0.0\nval\t1.0\nend point\nend envelope\nend wavetrack\n";
        let err = map(&project(bad), &StaticResolver::with_blocks(&[])).unwrap_err();
        assert!(matches!(err, SemanticError::StructuralInconsistency { .. }));
    }

    #[test]
    fn label_count_is_cross_checked() {
        let body = "labeltrack\nname\tmarks\nnumLabels\t1\nlabel\nt\t1.0\ntitle\tverse\nend label\nend labeltrack\n";
        let doc = map(&project(body), &StaticResolver::with_blocks(&[])).unwrap();
        assert_eq!(doc.root.children[0].children.len(), 1);

        let bad = "labeltrack\nname\tmarks\nnumLabels\t2\nlabel\nt\t1.0\ntitle\tverse\nend label\nend labeltrack\n";
        let err = map(&project(bad), &StaticResolver::with_blocks(&[])).unwrap_err();
        assert!(matches!(err, SemanticError::StructuralInconsistency { .. }));
    }

    #[test]
    fn declared_block_count_is_cross_checked() {
        let bad = "wavetrack\nname\tv\nchannel\t0\nrate\t44100\nclip\noffset\t0\nformat\t131073\nnumBlocks\t2\nblock\nfile\tblock001\nstart\t0\nlen\t1\nend block\nend clip\nend wavetrack\n";
        let err = map(&project(bad), &StaticResolver::with_blocks(&["block001"])).unwrap_err();
        assert!(matches!(err, SemanticError::StructuralInconsistency { .. }));
    }

    #[test]
    fn drop_dispositions() {
        // windowstate: dropped with one warning, no modern node.
        let doc = map(
            &project("windowstate\nx\t10\ny\t20\nend windowstate\n"),
            &StaticResolver::with_blocks(&[]),
        )
        .unwrap();
        assert!(doc.root.children.is_empty());
        assert_eq!(doc.warnings.len(), 1);
        assert!(doc.warnings[0].contains("windowstate"));

        // comment: dropped without a word.
        let doc = map(
            &project("comment\ntext\tmixed on tuesday\nend comment\n"),
            &StaticResolver::with_blocks(&[]),
        )
        .unwrap();
        assert!(doc.root.children.is_empty());
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn fatal_tag_aborts() {
        let err = map(
            &project("embeddeddata\nend embeddeddata\n"),
            &StaticResolver::with_blocks(&[]),
        )
        .unwrap_err();
        match err {
            SemanticError::FatalTag { tag, .. } => assert_eq!(tag, "embeddeddata"),
            other => panic!("expected FatalTag, got {other:?}"),
        }
    }

    #[test]
    fn unknown_attributes_warn_but_convert() {
        let body = "wavetrack\nname\tv\nchannel\t0\nrate\t44100\nvpos\t3\nend wavetrack\n";
        let doc = map(&project(body), &StaticResolver::with_blocks(&[])).unwrap();
        assert_eq!(doc.tracks, 1);
        assert!(doc.warnings.iter().any(|w| w.contains("vpos")));
        assert_eq!(doc.root.children[0].attr("vpos"), None);
    }

    #[test]
    fn timetrack_envelope_is_allowed() {
        let body = "timetrack\nname\ttempo\nenvelope\nnumPoints\t1\npoint\nt\t0.0\nval\t1.0\nend point\nend envelope\nend timetrack\n";
        let doc = map(&project(body), &StaticResolver::with_blocks(&[])).unwrap();
        assert_eq!(doc.root.children[0].tag, "timetrack");
        assert_eq!(doc.root.children[0].children[0].tag, "envelope");
    }
}
