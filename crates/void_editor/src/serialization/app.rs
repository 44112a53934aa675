//! Document-level resources: options and scripts.

use serde::{Deserialize, Serialize};
use void_scene::{AppOptions, NodeId, Script, ScriptKind};

use super::error::SerializeError;
use super::record::{Generator, Record};
use super::serializer::TypeSerializer;

/// Fixed record id of the options section.
pub const OPTIONS_ID: &str = "options";

pub struct OptionsSerializer;

impl TypeSerializer for OptionsSerializer {
    type Target = AppOptions;

    fn generator(&self) -> Generator {
        Generator::Options
    }

    fn to_json(&self, options: &AppOptions) -> Result<Record, SerializeError> {
        Record::new(
            NodeId::from_string(OPTIONS_ID),
            self.generator(),
            "Options",
            Vec::new(),
            options,
        )
    }

    fn from_json(&self, record: &Record) -> Result<AppOptions, SerializeError> {
        record.body()
    }
}

#[derive(Serialize, Deserialize)]
struct ScriptBody {
    name: String,
    #[serde(rename = "type")]
    kind: ScriptKind,
    #[serde(default)]
    source: String,
}

pub struct ScriptSerializer;

impl TypeSerializer for ScriptSerializer {
    type Target = Script;

    fn generator(&self) -> Generator {
        Generator::Script
    }

    fn to_json(&self, script: &Script) -> Result<Record, SerializeError> {
        let body = ScriptBody {
            name: script.name.clone(),
            kind: script.kind,
            source: script.source.clone(),
        };
        Record::new(script.id.clone(), self.generator(), "Script", Vec::new(), &body)
    }

    fn from_json(&self, record: &Record) -> Result<Script, SerializeError> {
        let body: ScriptBody = record.body()?;
        Ok(Script {
            id: record.id.clone(),
            name: body.name,
            kind: body.kind,
            source: body.source,
        })
    }
}
