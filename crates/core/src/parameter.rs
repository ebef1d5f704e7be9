// SPDX-License-Identifier: Apache-2.0

//! Parameter records and the alias → canonical record conversion table.
//!
//! Mirrors the decorator-level `Type` aliases of the original binding
//! (`FILE_IN_STDIN`, `COLLECTION_FILE_INOUT`, ...): each alias is a partial
//! overlay applied on top of a default [`Parameter`], and any explicit
//! per-field overrides from the user are applied last. See
//! [`Parameter::from_alias`] and [`Parameter::from_overrides`].

use crate::error::CoreError;
use crate::sentinel::{DEFAULT_WEIGHT, UNDEFINED_CONTENT_TYPE};
use serde::{Deserialize, Serialize};

/// Wire content type of a parameter, as tagged for the native runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    Object,
    File,
    Directory,
    Collection,
    ExternalStream,
    ExternalPsco,
    Bool,
    String,
    Int,
    Long,
    Double,
}

impl ContentType {
    pub fn as_wire_tag(self) -> &'static str {
        match self {
            ContentType::Object => "OBJECT",
            ContentType::File => "FILE",
            ContentType::Directory => "DIRECTORY",
            ContentType::Collection => "COLLECTION",
            ContentType::ExternalStream => "EXTERNAL_STREAM",
            ContentType::ExternalPsco => "EXTERNAL_PSCO",
            ContentType::Bool => "BOOLEAN",
            ContentType::String => "STRING",
            ContentType::Int => "INT",
            ContentType::Long => "LONG",
            ContentType::Double => "DOUBLE",
        }
    }

    pub fn from_wire_tag(tag: &str) -> Result<Self, CoreError> {
        Ok(match tag {
            "OBJECT" => ContentType::Object,
            "FILE" => ContentType::File,
            "DIRECTORY" => ContentType::Directory,
            "COLLECTION" => ContentType::Collection,
            "EXTERNAL_STREAM" => ContentType::ExternalStream,
            "EXTERNAL_PSCO" => ContentType::ExternalPsco,
            "BOOLEAN" => ContentType::Bool,
            "STRING" => ContentType::String,
            "INT" => ContentType::Int,
            "LONG" => ContentType::Long,
            "DOUBLE" => ContentType::Double,
            other => return Err(CoreError::InvalidContentType(other.to_string())),
        })
    }
}

/// Data-flow direction of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    In,
    Out,
    Inout,
    Concurrent,
    Commutative,
}

impl Direction {
    pub fn as_wire_tag(self) -> &'static str {
        match self {
            Direction::In => "IN",
            Direction::Out => "OUT",
            Direction::Inout => "INOUT",
            Direction::Concurrent => "CONCURRENT",
            Direction::Commutative => "COMMUTATIVE",
        }
    }

    pub fn from_wire_tag(tag: &str) -> Result<Self, CoreError> {
        Ok(match tag {
            "IN" => Direction::In,
            "OUT" => Direction::Out,
            "INOUT" => Direction::Inout,
            "CONCURRENT" => Direction::Concurrent,
            "COMMUTATIVE" => Direction::Commutative,
            other => return Err(CoreError::InvalidDirection(other.to_string())),
        })
    }
}

/// Binding of a FILE parameter to a standard stream of the spawned task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamBinding {
    Unspecified,
    Stdin,
    Stdout,
    Stderr,
}

impl StreamBinding {
    pub fn as_wire_tag(self) -> &'static str {
        match self {
            StreamBinding::Unspecified => "UNSPECIFIED",
            StreamBinding::Stdin => "STDIN",
            StreamBinding::Stdout => "STDOUT",
            StreamBinding::Stderr => "STDERR",
        }
    }

    pub fn from_wire_tag(tag: &str) -> Result<Self, CoreError> {
        Ok(match tag {
            "UNSPECIFIED" => StreamBinding::Unspecified,
            "STDIN" => StreamBinding::Stdin,
            "STDOUT" => StreamBinding::Stdout,
            "STDERR" => StreamBinding::Stderr,
            other => return Err(CoreError::InvalidStreamBinding(other.to_string())),
        })
    }
}

/// Closed enumeration of the decorator-level parameter aliases.
///
/// Each variant names one entry of the original `_param_conversion_dict_`.
/// `StreamIn`/`StreamOut` map to [`ContentType::ExternalStream`] — the
/// source dictionary referenced a malformed constant
/// (`TYPE.EXTERNALParamDictKeys.StdIOStream`) at this point; we assume the
/// intended type was `EXTERNAL_STREAM` and do not propagate the typo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamAlias {
    In,
    Out,
    Inout,
    Concurrent,
    Commutative,
    File,
    FileIn,
    FileOut,
    FileInout,
    Directory,
    DirectoryIn,
    DirectoryOut,
    DirectoryInout,
    FileConcurrent,
    FileCommutative,
    FileStdin,
    FileStderr,
    FileStdout,
    FileInStdin,
    FileInStderr,
    FileInStdout,
    FileOutStdin,
    FileOutStderr,
    FileOutStdout,
    FileInoutStdin,
    FileInoutStderr,
    FileInoutStdout,
    FileConcurrentStdin,
    FileConcurrentStderr,
    FileConcurrentStdout,
    FileCommutativeStdin,
    FileCommutativeStderr,
    FileCommutativeStdout,
    Collection,
    CollectionIn,
    CollectionInout,
    CollectionOut,
    StreamIn,
    StreamOut,
    CollectionFile,
    CollectionFileIn,
    CollectionFileInout,
    CollectionFileOut,
}

/// Partial overlay applied on top of a default [`Parameter`].
///
/// `None` fields leave the default (or the alias overlay, when composed via
/// [`Parameter::from_alias`]) untouched.
#[derive(Debug, Clone, Default)]
struct Overlay {
    content_type: Option<ContentType>,
    direction: Option<Direction>,
    stream_binding: Option<StreamBinding>,
    is_file_collection: Option<bool>,
    keep_rename: Option<bool>,
}

impl ParamAlias {
    /// The overlay this alias applies over the default parameter.
    fn overlay(self) -> Overlay {
        use ContentType::*;
        use Direction::*;
        use StreamBinding::*;
        let o = Overlay::default();
        match self {
            ParamAlias::In => o,
            ParamAlias::Out => Overlay {
                direction: Some(Out),
                ..o
            },
            ParamAlias::Inout => Overlay {
                direction: Some(Inout),
                ..o
            },
            ParamAlias::Concurrent => Overlay {
                direction: Some(Concurrent),
                ..o
            },
            ParamAlias::Commutative => Overlay {
                direction: Some(Commutative),
                ..o
            },
            ParamAlias::File => Overlay {
                content_type: Some(File),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileIn => Overlay {
                content_type: Some(File),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileOut => Overlay {
                content_type: Some(File),
                direction: Some(Out),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileInout => Overlay {
                content_type: Some(File),
                direction: Some(Inout),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::Directory => Overlay {
                content_type: Some(Directory),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::DirectoryIn => Overlay {
                content_type: Some(Directory),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::DirectoryOut => Overlay {
                content_type: Some(Directory),
                direction: Some(Out),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::DirectoryInout => Overlay {
                content_type: Some(Directory),
                direction: Some(Inout),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileConcurrent => Overlay {
                content_type: Some(File),
                direction: Some(Concurrent),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileCommutative => Overlay {
                content_type: Some(File),
                direction: Some(Commutative),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileStdin => Overlay {
                content_type: Some(File),
                stream_binding: Some(Stdin),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileStderr => Overlay {
                content_type: Some(File),
                stream_binding: Some(Stderr),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileStdout => Overlay {
                content_type: Some(File),
                stream_binding: Some(Stdout),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileInStdin => Overlay {
                content_type: Some(File),
                direction: Some(In),
                stream_binding: Some(Stdin),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileInStderr => Overlay {
                content_type: Some(File),
                direction: Some(In),
                stream_binding: Some(Stderr),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileInStdout => Overlay {
                content_type: Some(File),
                direction: Some(In),
                stream_binding: Some(Stdout),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileOutStdin => Overlay {
                content_type: Some(File),
                direction: Some(Out),
                stream_binding: Some(Stdin),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileOutStderr => Overlay {
                content_type: Some(File),
                direction: Some(Out),
                stream_binding: Some(Stderr),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileOutStdout => Overlay {
                content_type: Some(File),
                direction: Some(Out),
                stream_binding: Some(Stdout),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileInoutStdin => Overlay {
                content_type: Some(File),
                direction: Some(Inout),
                stream_binding: Some(Stdin),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileInoutStderr => Overlay {
                content_type: Some(File),
                direction: Some(Inout),
                stream_binding: Some(Stderr),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileInoutStdout => Overlay {
                content_type: Some(File),
                direction: Some(Inout),
                stream_binding: Some(Stdout),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileConcurrentStdin => Overlay {
                content_type: Some(File),
                direction: Some(Concurrent),
                stream_binding: Some(Stdin),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileConcurrentStderr => Overlay {
                content_type: Some(File),
                direction: Some(Concurrent),
                stream_binding: Some(Stderr),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileConcurrentStdout => Overlay {
                content_type: Some(File),
                direction: Some(Concurrent),
                stream_binding: Some(Stdout),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileCommutativeStdin => Overlay {
                content_type: Some(File),
                direction: Some(Commutative),
                stream_binding: Some(Stdin),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileCommutativeStderr => Overlay {
                content_type: Some(File),
                direction: Some(Commutative),
                stream_binding: Some(Stderr),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::FileCommutativeStdout => Overlay {
                content_type: Some(File),
                direction: Some(Commutative),
                stream_binding: Some(Stdout),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::Collection => Overlay {
                content_type: Some(Collection),
                ..o
            },
            ParamAlias::CollectionIn => Overlay {
                content_type: Some(Collection),
                direction: Some(In),
                ..o
            },
            ParamAlias::CollectionInout => Overlay {
                content_type: Some(Collection),
                direction: Some(Inout),
                ..o
            },
            ParamAlias::CollectionOut => Overlay {
                content_type: Some(Collection),
                direction: Some(Out),
                ..o
            },
            ParamAlias::StreamIn => Overlay {
                content_type: Some(ExternalStream),
                direction: Some(In),
                ..o
            },
            ParamAlias::StreamOut => Overlay {
                content_type: Some(ExternalStream),
                direction: Some(Out),
                ..o
            },
            ParamAlias::CollectionFile => Overlay {
                content_type: Some(Collection),
                is_file_collection: Some(true),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::CollectionFileIn => Overlay {
                content_type: Some(Collection),
                direction: Some(In),
                is_file_collection: Some(true),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::CollectionFileInout => Overlay {
                content_type: Some(Collection),
                direction: Some(Inout),
                is_file_collection: Some(true),
                keep_rename: Some(false),
                ..o
            },
            ParamAlias::CollectionFileOut => Overlay {
                content_type: Some(Collection),
                direction: Some(Out),
                is_file_collection: Some(true),
                keep_rename: Some(false),
                ..o
            },
        }
    }
}

/// Explicit per-field overrides a user can layer on top of an alias, as
/// carried by the `Type`/`Direction`/`StdIOStream`/... decorator keys.
///
/// Applied in this exact order after the alias overlay: direction, stream
/// binding, prefix, depth, weight, keep_rename.
#[derive(Debug, Clone, Default)]
pub struct ParamOverrides {
    pub alias: Option<ParamAlias>,
    pub direction: Option<Direction>,
    pub stream_binding: Option<StreamBinding>,
    pub prefix: Option<String>,
    pub depth: Option<u32>,
    pub weight: Option<String>,
    pub keep_rename: Option<bool>,
}

/// Per-task parameter descriptor (§3, Parameter record).
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: Option<String>,
    /// Opaque payload; absent for FILE/DIRECTORY parameters.
    pub content: Option<RuntimeValue>,
    pub content_type: ContentType,
    pub direction: Direction,
    pub stream_binding: StreamBinding,
    pub prefix: String,
    /// Serialized-object path, assigned by the runtime.
    pub file_name: Option<String>,
    /// True when the value is produced by another task (a future).
    pub is_future: bool,
    pub is_file_collection: bool,
    /// Collection nesting depth, always >= 1.
    pub depth: u32,
    /// "module:class", or [`UNDEFINED_CONTENT_TYPE`].
    pub extra_content_type: String,
    /// Decimal string, default "1.0".
    pub weight: String,
    pub keep_rename: bool,
}

impl Default for Parameter {
    fn default() -> Self {
        Parameter {
            name: None,
            content: None,
            content_type: ContentType::Object,
            direction: Direction::In,
            stream_binding: StreamBinding::Unspecified,
            prefix: "null".to_string(),
            file_name: None,
            is_future: false,
            is_file_collection: false,
            depth: 1,
            extra_content_type: UNDEFINED_CONTENT_TYPE.to_string(),
            weight: DEFAULT_WEIGHT.to_string(),
            keep_rename: true,
        }
    }
}

impl Parameter {
    /// Construct the canonical record for a decorator-level alias.
    pub fn from_alias(alias: ParamAlias) -> Self {
        let mut param = Parameter::default();
        param.apply_overlay(&alias.overlay());
        param
    }

    /// Construct a record from an alias plus explicit overrides, composed
    /// alias-first, then overrides in field declaration order — matching
    /// `get_parameter_from_dictionary`.
    pub fn from_overrides(overrides: &ParamOverrides) -> Self {
        let mut param = match overrides.alias {
            Some(alias) => Parameter::from_alias(alias),
            None => Parameter::default(),
        };
        if let Some(direction) = overrides.direction {
            param.direction = direction;
        }
        if let Some(stream_binding) = overrides.stream_binding {
            param.stream_binding = stream_binding;
        }
        if let Some(prefix) = &overrides.prefix {
            param.prefix = prefix.clone();
        }
        if let Some(depth) = overrides.depth {
            param.depth = depth;
        }
        if let Some(weight) = &overrides.weight {
            param.weight = weight.clone();
        }
        if let Some(keep_rename) = overrides.keep_rename {
            param.keep_rename = keep_rename;
        }
        param
    }

    fn apply_overlay(&mut self, overlay: &Overlay) {
        if let Some(content_type) = overlay.content_type {
            self.content_type = content_type;
        }
        if let Some(direction) = overlay.direction {
            self.direction = direction;
        }
        if let Some(stream_binding) = overlay.stream_binding {
            self.stream_binding = stream_binding;
        }
        if let Some(is_file_collection) = overlay.is_file_collection {
            self.is_file_collection = is_file_collection;
        }
        if let Some(keep_rename) = overlay.keep_rename {
            self.keep_rename = keep_rename;
        }
    }

    pub fn is_object(&self) -> bool {
        self.content_type == ContentType::Object
    }

    pub fn is_file(&self) -> bool {
        self.content_type == ContentType::File
    }

    pub fn is_directory(&self) -> bool {
        self.content_type == ContentType::Directory
    }
}

/// Platform signed-32 bound, used to split INT from LONG (§4.2).
const INT_MIN: i64 = i32::MIN as i64;
const INT_MAX: i64 = i32::MAX as i64;

/// A value as seen by [`infer_type`]. Stands in for the dynamically-typed
/// arguments a task receives; the worker only ever needs to know which of
/// these coarse shapes a value has, never its full representation.
#[derive(Debug, Clone)]
pub enum RuntimeValue {
    /// A value with storage-backend identity (PSCO candidate).
    Persistent { id: Option<String> },
    /// A scalar from a numeric library (e.g. a boxed float); must be
    /// classified as `OBJECT`, not misread as a bare float/int.
    NumericLibraryScalar,
    Bool(bool),
    Str(String),
    Int(i64),
    Double(f64),
    Collection(Vec<RuntimeValue>),
    Opaque,
}

/// Probe failures during persistent-object classification are swallowed:
/// an object that raises while being probed is not, in fact, persistent.
///
/// Classify a runtime value per the load-bearing ordering of §4.2:
/// persistent-object probe, numeric-library scalar, bool, string, integer,
/// floating, collection, else object.
pub fn infer_type(value: &RuntimeValue, depth: u32) -> ContentType {
    match value {
        RuntimeValue::Persistent { id } => match id {
            Some(id) if !id.is_empty() && id != "None" => ContentType::ExternalPsco,
            _ => ContentType::Object,
        },
        RuntimeValue::NumericLibraryScalar => ContentType::Object,
        RuntimeValue::Bool(_) => ContentType::Bool,
        RuntimeValue::Str(_) => ContentType::String,
        RuntimeValue::Int(v) => {
            if (INT_MIN..=INT_MAX).contains(v) {
                ContentType::Int
            } else {
                ContentType::Long
            }
        }
        RuntimeValue::Double(_) => ContentType::Double,
        RuntimeValue::Collection(_) if depth > 0 => ContentType::Collection,
        RuntimeValue::Collection(_) | RuntimeValue::Opaque => ContentType::Object,
    }
}

#[cfg(test)]
#[path = "parameter_tests.rs"]
mod tests;
