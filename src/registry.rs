//! Field specifications and the ordered registry that holds them

use std::collections::HashSet;

use serde::Deserialize;

use crate::document::Query;
use crate::error::RegistryError;
use crate::transform::Transform;

/// One value to extract: a unique label, a selector, and an optional transform.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    label: String,
    query: Query,
    transform: Option<Transform>,
}

impl FieldSpec {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn selector(&self) -> &str {
        self.query.as_str()
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn transform(&self) -> Option<&Transform> {
        self.transform.as_ref()
    }
}

/// Serialized field definition, as read from a field file.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDef {
    pub label: String,
    pub selector: String,
    /// Optional named transform: trim, parse_price, number, ...
    #[serde(default)]
    pub transform: Option<String>,
}

/// Ordered collection of field specs with unique labels.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    specs: Vec<FieldSpec>,
    labels: HashSet<String>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. Fails on a duplicate, empty or multi-line label, or an
    /// empty/unparseable selector.
    pub fn register(
        &mut self,
        label: impl Into<String>,
        selector: &str,
        transform: Option<Transform>,
    ) -> Result<&mut Self, RegistryError> {
        let label = label.into();
        if label.is_empty() {
            return Err(RegistryError::EmptyLabel);
        }
        if label.contains(['\n', '\r']) {
            return Err(RegistryError::MultilineLabel(label));
        }
        if self.labels.contains(&label) {
            return Err(RegistryError::DuplicateLabel(label));
        }
        if selector.trim().is_empty() {
            return Err(RegistryError::EmptySelector(label));
        }

        let query = Query::parse(selector).map_err(|reason| RegistryError::InvalidSelector {
            label: label.clone(),
            selector: selector.to_string(),
            reason,
        })?;

        self.labels.insert(label.clone());
        self.specs.push(FieldSpec {
            label,
            query,
            transform,
        });
        Ok(self)
    }

    /// Build a registry from serialized definitions, in order.
    pub fn from_defs(defs: &[FieldDef]) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for def in defs {
            let transform = match def.transform.as_deref() {
                Some(name) => Some(name.parse::<Transform>().map_err(|_| {
                    RegistryError::UnknownTransform {
                        label: def.label.clone(),
                        name: name.to_string(),
                    }
                })?),
                None => None,
            };
            registry.register(def.label.clone(), &def.selector, transform)?;
        }
        Ok(registry)
    }

    /// All specs in registration order.
    pub fn all(&self) -> &[FieldSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// The four gold-price fields of goldtraders.or.th.
pub fn gold_prices() -> Result<FieldRegistry, RegistryError> {
    let mut registry = FieldRegistry::new();
    registry
        .register("ทองคำแท่งรับซื้อ", "#DetailPlace_uc_goldprices1_lblBLBuy b font", None)?
        .register("ทองคำแท่งขายออก", "#DetailPlace_uc_goldprices1_lblBLSell b font", None)?
        .register("ทองรูปพรรณรับซื้อ", "#DetailPlace_uc_goldprices1_lblOMBuy b font", None)?
        .register("ทองรูปพรรณขายออก", "#DetailPlace_uc_goldprices1_lblOMSell b font", None)?;
    Ok(registry)
}
