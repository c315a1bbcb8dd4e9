//! Pure extraction of product elements from IFC (STEP) text.
//!
//! One scan over the file collects product entities, the relationships that
//! attach property sets and spatial containers to them, and the auxiliary
//! entities those relationships point at. Products are then decoded and
//! resolved against those lookups.
//!
//! Attribute positions used here (0-based):
//!
//! ```text
//! IfcProject                        2 Name, 3 Description
//! IfcProduct                        0 GlobalId, 2 Name, 3 Description, 4 ObjectType
//! IfcElement                        7 Tag
//! IfcRelDefinesByProperties         4 RelatedObjects, 5 RelatingPropertyDefinition
//! IfcRelContainedInSpatialStructure 4 RelatedElements, 5 RelatingStructure
//! IfcRelAggregates                  4 RelatingObject, 5 RelatedObjects
//! IfcPropertySet                    2 Name, 4 HasProperties
//! IfcPropertySingleValue            0 Name, 2 NominalValue, 3 Unit
//! IfcSIUnit                         2 Prefix, 3 Name
//! IfcConversionBasedUnit            2 Name
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use ifc_lite_core::{build_entity_index, AttributeValue, DecodedEntity, EntityDecoder, EntityScanner};
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::classify::{product_type, value_type_name, ProductKind};
use crate::error::IfcError;

static SCHEMA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)FILE_SCHEMA\s*\(\s*\(\s*'([^']+)'").expect("valid regex")
});

/// Upper bound on spatial parent hops when resolving an element's location.
const MAX_SPATIAL_DEPTH: usize = 32;

/// Everything the ingestion pipeline needs from one model file.
#[derive(Debug, Clone, Default)]
pub struct IfcModel {
    /// Header schema identifier, e.g. `IFC4` or `IFC2X3`.
    pub schema: Option<String>,
    pub project_name: Option<String>,
    pub project_description: Option<String>,
    /// Product elements in file order.
    pub elements: Vec<ProductElement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductElement {
    /// STEP entity number.
    pub ifc_id: u32,
    pub guid: String,
    /// Schema spelling of the entity type, e.g. `IfcWall`.
    pub ifc_type: &'static str,
    pub name: Option<String>,
    pub description: Option<String>,
    pub object_type: Option<String>,
    pub tag: Option<String>,
    pub property_sets: Vec<PropertySetData>,
    /// Name of the containing building, if any.
    pub building: Option<String>,
    /// Name of the containing storey, if any.
    pub storey: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySetData {
    pub name: String,
    pub properties: Vec<PropertyValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyValue {
    pub name: String,
    /// Nominal value rendered as text; `None` when unset.
    pub value: Option<String>,
    /// Schema spelling of the wrapped value type, e.g. `IfcLabel`.
    pub value_type: Option<String>,
    pub unit: Option<String>,
}

impl ProductElement {
    /// JSON stored in `ifc_elements.ifc_data`.
    pub fn to_ifc_data(&self) -> Value {
        let mut data = Map::new();
        data.insert("ifc_id".into(), json!(self.ifc_id));
        data.insert("ifc_guid".into(), json!(self.guid));
        data.insert("ifc_type".into(), json!(self.ifc_type));
        for (key, value) in [
            ("name", &self.name),
            ("description", &self.description),
            ("tag", &self.tag),
            ("objecttype", &self.object_type),
        ] {
            if let Some(v) = value {
                data.insert(key.into(), json!(v));
            }
        }

        let psets: Vec<Value> = self
            .property_sets
            .iter()
            .map(|pset| {
                let props: Map<String, Value> = pset
                    .properties
                    .iter()
                    .map(|p| {
                        (
                            p.name.clone(),
                            json!({ "value": p.value, "type": p.value_type }),
                        )
                    })
                    .collect();
                json!({ "name": pset.name, "properties": props })
            })
            .collect();
        data.insert("properties".into(), Value::Array(psets));

        Value::Object(data)
    }
}

/// Read the schema identifier from the STEP header.
pub fn read_schema(content: &str) -> Option<String> {
    SCHEMA_RE
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_uppercase())
}

// ---------------------------------------------------------------------------
// Scan bookkeeping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuxKind {
    PropertySet,
    SingleValue,
    SiUnit,
    NamedUnit,
}

struct ProductJob {
    id: u32,
    ifc_type: &'static str,
    kind: ProductKind,
    start: usize,
    end: usize,
}

#[derive(Default)]
struct Relations {
    /// Object id -> property set ids.
    property_sets: HashMap<u32, Vec<u32>>,
    /// Element id -> spatial structure id.
    contained_in: HashMap<u32, u32>,
    /// Child id -> aggregating parent id.
    aggregated_in: HashMap<u32, u32>,
}

impl Relations {
    fn record(&mut self, upper_type: &str, entity: &DecodedEntity) {
        match upper_type {
            "IFCRELDEFINESBYPROPERTIES" => {
                let Some(pset) = entity.get_ref(5) else { return };
                for object in ref_list(entity.get(4)) {
                    self.property_sets.entry(object).or_default().push(pset);
                }
            }
            "IFCRELCONTAINEDINSPATIALSTRUCTURE" => {
                let Some(structure) = entity.get_ref(5) else { return };
                for element in ref_list(entity.get(4)) {
                    self.contained_in.entry(element).or_insert(structure);
                }
            }
            "IFCRELAGGREGATES" => {
                let Some(parent) = entity.get_ref(4) else { return };
                for child in ref_list(entity.get(5)) {
                    self.aggregated_in.entry(child).or_insert(parent);
                }
            }
            _ => {}
        }
    }

    fn parent_of(&self, id: u32) -> Option<u32> {
        self.contained_in
            .get(&id)
            .or_else(|| self.aggregated_in.get(&id))
            .copied()
    }
}

fn ref_list(attr: Option<&AttributeValue>) -> Vec<u32> {
    attr.and_then(|a| a.as_list())
        .map(|items| items.iter().filter_map(|i| i.as_entity_ref()).collect())
        .unwrap_or_default()
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn decode(decoder: &mut EntityDecoder<'_>, id: u32, start: usize, end: usize) -> Option<DecodedEntity> {
    match decoder.decode_at(start, end) {
        Ok(entity) => Some(entity),
        Err(e) => {
            tracing::debug!(entity_id = id, error = %e, "Skipping undecodable entity");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Value rendering
// ---------------------------------------------------------------------------

fn render_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}

fn render_value(value: &AttributeValue) -> Option<String> {
    match value {
        AttributeValue::String(s) => Some(s.clone()),
        AttributeValue::Integer(i) => Some(i.to_string()),
        AttributeValue::Float(f) => Some(render_float(*f)),
        AttributeValue::Enum(e) => Some(match e.as_str() {
            "T" => "True".to_string(),
            "F" => "False".to_string(),
            "U" => "UNKNOWN".to_string(),
            other => other.to_string(),
        }),
        AttributeValue::EntityRef(id) => Some(format!("#{id}")),
        AttributeValue::List(items) => {
            let parts: Vec<String> = items.iter().filter_map(render_value).collect();
            Some(parts.join(", "))
        }
        AttributeValue::Null | AttributeValue::Derived => None,
    }
}

/// Split a `NominalValue` into its text and wrapped type name.
fn nominal_value(attr: Option<&AttributeValue>) -> (Option<String>, Option<String>) {
    match attr {
        Some(AttributeValue::List(items)) if items.len() >= 2 => match items[0].as_string() {
            Some(type_name) => (render_value(&items[1]), Some(value_type_name(type_name))),
            None => (render_value(&items[1]), None),
        },
        Some(v) if !v.is_null() => (render_value(v), None),
        _ => (None, None),
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

struct Resolver<'a> {
    decoder: EntityDecoder<'a>,
    aux: HashMap<u32, AuxKind>,
    pset_cache: HashMap<u32, Option<PropertySetData>>,
}

impl<'a> Resolver<'a> {
    fn decode_aux(&mut self, id: u32, expected: AuxKind) -> Option<DecodedEntity> {
        if self.aux.get(&id) != Some(&expected) {
            return None;
        }
        self.decoder.decode_by_id(id).ok()
    }

    fn unit_name(&mut self, id: u32) -> Option<String> {
        match self.aux.get(&id).copied() {
            Some(AuxKind::SiUnit) => {
                let unit = self.decoder.decode_by_id(id).ok()?;
                let name = unit.get(3).and_then(|v| v.as_enum())?.to_string();
                let prefix = unit.get(2).and_then(|v| v.as_enum()).unwrap_or("");
                Some(format!("{prefix}{name}"))
            }
            Some(AuxKind::NamedUnit) => {
                let unit = self.decoder.decode_by_id(id).ok()?;
                non_empty(unit.get_string(2))
            }
            _ => None,
        }
    }

    fn property(&mut self, id: u32) -> Option<PropertyValue> {
        let entity = self.decode_aux(id, AuxKind::SingleValue)?;
        let name = non_empty(entity.get_string(0))?;
        let (value, value_type) = nominal_value(entity.get(2));
        let unit = entity.get_ref(3).and_then(|u| self.unit_name(u));
        Some(PropertyValue {
            name,
            value,
            value_type,
            unit,
        })
    }

    fn property_set(&mut self, id: u32) -> Option<PropertySetData> {
        if let Some(cached) = self.pset_cache.get(&id) {
            return cached.clone();
        }
        let resolved = self.decode_aux(id, AuxKind::PropertySet).map(|entity| {
            let name = entity.get_string(2).unwrap_or_default().to_string();
            let properties = ref_list(entity.get(4))
                .into_iter()
                .filter_map(|p| self.property(p))
                .collect();
            PropertySetData { name, properties }
        });
        self.pset_cache.insert(id, resolved.clone());
        resolved
    }
}

/// Parse IFC text into a model summary.
///
/// Entities that fail to decode or carry no GlobalId are skipped.
pub fn extract_model(content: &str) -> Result<IfcModel, IfcError> {
    let body = content.trim_start_matches('\u{feff}').trim_start();
    if !body.starts_with("ISO-10303-21") {
        return Err(IfcError::Parse(
            "missing ISO-10303-21 header, not a STEP file".into(),
        ));
    }

    let mut model = IfcModel {
        schema: read_schema(content),
        ..Default::default()
    };

    let mut decoder = EntityDecoder::with_index(content, build_entity_index(content));
    let mut scanner = EntityScanner::new(content);
    let mut jobs = Vec::new();
    let mut relations = Relations::default();
    let mut aux = HashMap::new();
    let mut project_seen = false;

    while let Some((id, type_name, start, end)) = scanner.next_entity() {
        if let Some((ifc_type, kind)) = product_type(type_name) {
            jobs.push(ProductJob {
                id,
                ifc_type,
                kind,
                start,
                end,
            });
            continue;
        }

        let upper = type_name.to_ascii_uppercase();
        match upper.as_str() {
            "IFCPROJECT" if !project_seen => {
                project_seen = true;
                if let Some(project) = decode(&mut decoder, id, start, end) {
                    model.project_name = non_empty(project.get_string(2));
                    model.project_description = non_empty(project.get_string(3));
                }
            }
            "IFCRELDEFINESBYPROPERTIES"
            | "IFCRELCONTAINEDINSPATIALSTRUCTURE"
            | "IFCRELAGGREGATES" => {
                if let Some(rel) = decode(&mut decoder, id, start, end) {
                    relations.record(&upper, &rel);
                }
            }
            "IFCPROPERTYSET" => {
                aux.insert(id, AuxKind::PropertySet);
            }
            "IFCPROPERTYSINGLEVALUE" => {
                aux.insert(id, AuxKind::SingleValue);
            }
            "IFCSIUNIT" => {
                aux.insert(id, AuxKind::SiUnit);
            }
            "IFCCONVERSIONBASEDUNIT" | "IFCCONTEXTDEPENDENTUNIT" => {
                aux.insert(id, AuxKind::NamedUnit);
            }
            _ => {}
        }
    }

    let mut resolver = Resolver {
        decoder,
        aux,
        pset_cache: HashMap::new(),
    };

    // Decode products first so spatial names are known before locating.
    let mut decoded = Vec::with_capacity(jobs.len());
    let mut spatial_names: HashMap<u32, (&'static str, Option<String>)> = HashMap::new();
    for job in &jobs {
        let Some(entity) = decode(&mut resolver.decoder, job.id, job.start, job.end) else {
            continue;
        };
        if job.kind == ProductKind::Spatial {
            spatial_names.insert(job.id, (job.ifc_type, non_empty(entity.get_string(2))));
        }
        decoded.push((job, entity));
    }

    for (job, entity) in decoded {
        let Some(guid) = non_empty(entity.get_string(0)) else {
            tracing::debug!(entity_id = job.id, ifc_type = job.ifc_type, "Product without GlobalId");
            continue;
        };

        let tag = if job.kind == ProductKind::Element {
            non_empty(entity.get_string(7))
        } else {
            None
        };

        let property_sets = relations
            .property_sets
            .get(&job.id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|pset| resolver.property_set(pset))
            .collect();

        let (building, storey) = locate(job.id, &relations, &spatial_names);

        model.elements.push(ProductElement {
            ifc_id: job.id,
            guid,
            ifc_type: job.ifc_type,
            name: non_empty(entity.get_string(2)),
            description: non_empty(entity.get_string(3)),
            object_type: non_empty(entity.get_string(4)),
            tag,
            property_sets,
            building,
            storey,
        });
    }

    tracing::debug!(
        schema = ?model.schema,
        elements = model.elements.len(),
        "IFC extraction complete"
    );
    Ok(model)
}

/// Walk containment and aggregation upwards to the nearest storey and building.
fn locate(
    id: u32,
    relations: &Relations,
    spatial: &HashMap<u32, (&'static str, Option<String>)>,
) -> (Option<String>, Option<String>) {
    let mut building = None;
    let mut storey = None;
    let mut current = relations.parent_of(id);

    for _ in 0..MAX_SPATIAL_DEPTH {
        let Some(node) = current else { break };
        if let Some((ifc_type, name)) = spatial.get(&node) {
            match *ifc_type {
                "IfcBuildingStorey" if storey.is_none() => storey = name.clone(),
                "IfcBuilding" if building.is_none() => building = name.clone(),
                _ => {}
            }
        }
        if building.is_some() && storey.is_some() {
            break;
        }
        current = relations.parent_of(node);
    }

    (building, storey)
}
