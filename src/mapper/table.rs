// src/mapper/table.rs

//! The legacy tag and attribute catalog
//!
//! Every tag the 1.0 format can contain is enumerated here with its
//! disposition, and every attribute with its modern name, value kind
//! and range. The mapper consults nothing else, so the whole
//! translation is auditable in this one file. A tag missing from the
//! catalog is a semantic error, never silently ignored.

/// What the mapper does with a legacy tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Translate into the modern node named here.
    Translate { modern_tag: &'static str },
    /// Known-obsolete, carries no project semantics: skip quietly.
    DropSilent,
    /// Known-obsolete but worth telling the user about once: skip and
    /// record a warning.
    DropWarn,
    /// Content the modern format cannot represent; conversion fails.
    Fatal { reason: &'static str },
}

/// Disposition of every known legacy tag.
pub const TAG_CATALOG: &[(&str, Disposition)] = &[
    ("project", Disposition::Translate { modern_tag: "project" }),
    ("wavetrack", Disposition::Translate { modern_tag: "wavetrack" }),
    ("labeltrack", Disposition::Translate { modern_tag: "labeltrack" }),
    ("timetrack", Disposition::Translate { modern_tag: "timetrack" }),
    ("clip", Disposition::Translate { modern_tag: "waveclip" }),
    ("block", Disposition::Translate { modern_tag: "waveblock" }),
    ("alias", Disposition::Translate { modern_tag: "aliasblockfile" }),
    ("envelope", Disposition::Translate { modern_tag: "envelope" }),
    ("point", Disposition::Translate { modern_tag: "controlpoint" }),
    ("label", Disposition::Translate { modern_tag: "label" }),
    // Free-text remarks some 1.0 builds wrote between tracks.
    ("comment", Disposition::DropSilent),
    // Per-machine UI state; meaningless after conversion.
    ("windowstate", Disposition::DropWarn),
    ("toolbars", Disposition::DropWarn),
    (
        "embeddeddata",
        Disposition::Fatal {
            reason: "inline sample data cannot be represented in the modern format",
        },
    ),
    (
        "rawdump",
        Disposition::Fatal {
            reason: "pre-0.95 debug serialization is not convertible",
        },
    ),
];

pub fn disposition(tag: &str) -> Option<Disposition> {
    TAG_CATALOG
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, d)| *d)
}

/// How an attribute value is decoded and checked.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ValueKind {
    /// Decimal integer; the 1.0 writer zero-padded sample counts to a
    /// fixed width, so leading zeros are accepted.
    Int { min: i64, max: i64 },
    /// Decimal float; locale-afflicted 1.0 builds wrote a comma
    /// decimal separator, normalized here to `.`.
    Float { min: f64, max: f64 },
    /// Free text, passed through verbatim.
    Text,
    /// Legacy sample-format code, stored canonically by name.
    SampleFormat,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct AttrSpec {
    /// Attribute name as the 1.0 writer spelled it.
    pub legacy: &'static str,
    /// Modern attribute name, or `None` for values that are checked
    /// or redistributed by the mapper but not emitted one-to-one.
    pub modern: Option<&'static str>,
    pub kind: ValueKind,
    pub required: bool,
}

const fn attr(
    legacy: &'static str,
    modern: Option<&'static str>,
    kind: ValueKind,
    required: bool,
) -> AttrSpec {
    AttrSpec {
        legacy,
        modern,
        kind,
        required,
    }
}

const COUNT: ValueKind = ValueKind::Int { min: 0, max: i64::MAX };
const TIME: ValueKind = ValueKind::Float { min: 0.0, max: f64::MAX };
const RATE: ValueKind = ValueKind::Float { min: 1.0, max: 1_000_000.0 };

const PROJECT_ATTRS: &[AttrSpec] = &[
    // The legacy version was consumed by the parser's gate; the
    // mapper stamps the modern format version instead.
    attr("version", None, ValueKind::Text, true),
    attr("projName", Some("projname"), ValueKind::Text, false),
    attr("rate", Some("rate"), RATE, false),
    attr("sel0", Some("sel0"), TIME, false),
    attr("sel1", Some("sel1"), TIME, false),
];

const WAVETRACK_ATTRS: &[AttrSpec] = &[
    attr("name", Some("name"), ValueKind::Text, true),
    attr("channel", Some("channel"), ValueKind::Int { min: 0, max: 2 }, true),
    attr("linked", Some("linked"), ValueKind::Int { min: 0, max: 1 }, false),
    attr("offset", Some("offset"), TIME, false),
    attr("rate", Some("rate"), RATE, true),
    attr("gain", Some("gain"), ValueKind::Float { min: 0.0, max: 10.0 }, false),
    attr("pan", Some("pan"), ValueKind::Float { min: -1.0, max: 1.0 }, false),
];

const LABELTRACK_ATTRS: &[AttrSpec] = &[
    attr("name", Some("name"), ValueKind::Text, true),
    attr("numLabels", Some("numlabels"), COUNT, false),
];

const TIMETRACK_ATTRS: &[AttrSpec] = &[attr("name", Some("name"), ValueKind::Text, false)];

const CLIP_ATTRS: &[AttrSpec] = &[
    attr("offset", Some("offset"), TIME, true),
    attr("format", Some("format"), ValueKind::SampleFormat, true),
    // Redundant block count written by late 1.0 builds; checked
    // against the actual children, never emitted.
    attr("numBlocks", None, COUNT, false),
];

// Block attributes are redistributed across the expanded
// waveblock/blockfile pair, so none map one-to-one.
const BLOCK_ATTRS: &[AttrSpec] = &[
    attr("file", None, ValueKind::Text, true),
    attr("start", None, COUNT, true),
    attr("len", None, COUNT, true),
];

const ALIAS_ATTRS: &[AttrSpec] = &[
    attr("start", None, COUNT, true),
    attr("path", None, ValueKind::Text, true),
    attr("aliasstart", None, COUNT, true),
    attr("len", None, COUNT, true),
    attr("channel", None, ValueKind::Int { min: 0, max: 2 }, false),
];

const ENVELOPE_ATTRS: &[AttrSpec] = &[attr("numPoints", Some("numpoints"), COUNT, true)];

const POINT_ATTRS: &[AttrSpec] = &[
    attr("t", Some("t"), TIME, true),
    attr("val", Some("val"), ValueKind::Float { min: 0.0, max: 2.0 }, true),
];

const LABEL_ATTRS: &[AttrSpec] = &[
    attr("t", Some("t"), TIME, true),
    attr("title", Some("title"), ValueKind::Text, true),
];

/// Attribute catalog of a translated tag.
pub(crate) fn attr_specs(tag: &str) -> &'static [AttrSpec] {
    match tag {
        "project" => PROJECT_ATTRS,
        "wavetrack" => WAVETRACK_ATTRS,
        "labeltrack" => LABELTRACK_ATTRS,
        "timetrack" => TIMETRACK_ATTRS,
        "clip" => CLIP_ATTRS,
        "block" => BLOCK_ATTRS,
        "alias" => ALIAS_ATTRS,
        "envelope" => ENVELOPE_ATTRS,
        "point" => POINT_ATTRS,
        "label" => LABEL_ATTRS,
        _ => &[],
    }
}

// Sample-format constants as the 1.0 code defined them.
const FORMAT_INT16: i64 = 0x0002_0001;
const FORMAT_INT24: i64 = 0x0004_0001;
const FORMAT_FLOAT32: i64 = 0x0004_000F;

/// Decode a raw legacy value to its canonical modern text, or explain
/// why it is out of range.
pub(crate) fn decode_value(kind: ValueKind, raw: &str) -> Result<String, String> {
    match kind {
        ValueKind::Text => Ok(raw.to_string()),

        ValueKind::Int { min, max } => {
            let value: i64 = raw
                .trim()
                .parse()
                .map_err(|_| "not a decimal integer".to_string())?;
            if value < min || value > max {
                return Err(format!("outside {min}..={max}"));
            }
            Ok(value.to_string())
        }

        ValueKind::Float { min, max } => {
            let value: f64 = raw
                .trim()
                .replace(',', ".")
                .parse()
                .map_err(|_| "not a decimal number".to_string())?;
            if !value.is_finite() {
                return Err("not a finite number".to_string());
            }
            if value < min || value > max {
                return Err(format!("outside {min}..={max}"));
            }
            Ok(value.to_string())
        }

        ValueKind::SampleFormat => {
            let code: i64 = raw
                .trim()
                .parse()
                .map_err(|_| "not a sample format code".to_string())?;
            match code {
                FORMAT_INT16 => Ok("int16".to_string()),
                FORMAT_INT24 => Ok("int24".to_string()),
                FORMAT_FLOAT32 => Ok("float32".to_string()),
                _ => Err("unknown sample format code".to_string()),
            }
        }
    }
}
