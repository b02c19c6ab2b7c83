use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::{
    deser::{deser_field_opt, serialize, DeserializationResult, SerializationResult},
    filter::{config, Filter, SharedConfig},
    json::{update_fields_or_fail, JsonUpdateKind},
    midi::Event,
};

use super::command::ResponseCallback;

const DEFAULT_NAME: &str = "Filter";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RequestKind {
    SetName(String),
    UpdateFilter(config::UpdateKind),
    Reset,
}

pub struct Slot {
    name: String,
    config: SharedConfig,
    filter: Filter,
    out: Vec<Event>,
}

impl Slot {
    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.into(),
            config: SharedConfig::default(),
            filter: Filter::new(),
            out: vec![],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // Handle for direct control-side flag flips, bypassing the request
    // channel.
    pub fn config(&self) -> SharedConfig {
        self.config.clone()
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn process_block(&mut self, input: &[Event]) {
        let config = self.config.load();
        self.filter.process_block(&config, input, &mut self.out);
    }

    pub fn output(&self) -> &[Event] {
        &self.out
    }

    pub fn reset(&mut self) {
        self.filter.reset();
    }

    pub fn process_request(&mut self, kind: RequestKind, cb: ResponseCallback) {
        type RK = RequestKind;
        match kind {
            RK::SetName(name) => cb(self.set_name(&name)),
            RK::UpdateFilter(kind) => cb(self.update_filter(&kind)),
            RK::Reset => {
                self.reset();
                cb(JsonUpdateKind::Ok);
            }
        }
    }

    pub fn serialize(&self) -> SerializationResult {
        let config = self.config.load();
        let result: serde_json::Value = json!({
            "name": serialize(&self.name)?,
            "filter": serialize(*config)?,
        });
        Ok(result)
    }

    pub fn deserialize(&mut self, source: &serde_json::Value) -> DeserializationResult {
        deser_field_opt(source, "name", |v| self.name = v)?;
        deser_field_opt(source, "filter", |v| self.config.store(v))?;
        Ok(())
    }

    pub fn clone_slot(&self) -> Slot {
        Slot {
            name: self.name.clone(),
            config: SharedConfig::new(*self.config.load()),
            filter: Filter::new(),
            out: vec![],
        }
    }

    fn set_name(&mut self, name: &str) -> JsonUpdateKind {
        self.name = name.into();
        update_fields_or_fail(|updates| {
            updates.push(("name".to_owned(), serialize(name)?));
            Ok(())
        })
    }

    fn update_filter(&mut self, kind: &config::UpdateKind) -> JsonUpdateKind {
        self.config.update(|config| config.apply(kind));
        let config = self.config.load();
        for conflict in config.conflicts() {
            warn!("Ambiguous filter flags on slot {:?}: {conflict:?}", self.name);
        }
        update_fields_or_fail(|updates| {
            updates.push(("filter".to_owned(), serialize(*config)?));
            Ok(())
        })
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::with_name(DEFAULT_NAME)
    }
}
