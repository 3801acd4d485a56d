//! # Label Data Model
//!
//! The input record for one label: shipping parties, part and order
//! metadata, the license plate, and the pre-encoded QR payload. Every
//! field is optional; a missing field is substituted by the binding's
//! default string at render time, never treated as an error.
//!
//! The record deserializes from the plain camelCase shape and, via
//! [`LabelData::from_json`], from the legacy feed document where the
//! record nests under `container_label`, the license plate arrives as
//! `lpn_1j`, and the QR payload arrives as `qr_code.encoded_string`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LabelError;

/// The ship-from party: supplier identity and origin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShipFrom {
    pub name: Option<String>,
    /// Multi-line street address, lines separated by `'\n'`.
    pub address: Option<String>,
    #[serde(alias = "supplier_code")]
    pub supplier_code: Option<String>,
    #[serde(alias = "country_of_origin")]
    pub country_of_origin: Option<String>,
}

/// The ship-to party: receiving plant and storage location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShipTo {
    pub name: Option<String>,
    /// Multi-line street address, lines separated by `'\n'`.
    pub address: Option<String>,
    pub plant: Option<String>,
    #[serde(alias = "storage_location")]
    pub storage_location: Option<String>,
}

/// One label's worth of data. Immutable for the duration of a render.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelData {
    #[serde(alias = "ship_from")]
    pub ship_from: ShipFrom,
    #[serde(alias = "ship_to")]
    pub ship_to: ShipTo,

    pub part_number: Option<String>,
    pub part_description: Option<String>,
    pub quantity: Option<String>,
    pub unit_of_measure: Option<String>,

    pub po_number: Option<String>,
    pub po_line_number: Option<String>,
    pub lot_number: Option<String>,
    pub production_date: Option<String>,
    pub expiration_date: Option<String>,

    /// The 1J-prefixed license plate identifier.
    #[serde(alias = "lpn_1j")]
    pub license_plate_number: Option<String>,

    /// Pre-encoded string embedded in the 2-D code verbatim.
    pub qr_payload: Option<String>,

    #[serde(alias = "qml")]
    pub quality_mark: Option<String>,
    #[serde(alias = "pcd")]
    pub process_control_date: Option<String>,
}

/// Names for the individual data fields a binding can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ShipFromName,
    ShipFromAddress,
    SupplierCode,
    CountryOfOrigin,
    ShipToName,
    ShipToAddress,
    Plant,
    StorageLocation,
    PartNumber,
    PartDescription,
    Quantity,
    UnitOfMeasure,
    PoNumber,
    PoLineNumber,
    LotNumber,
    ProductionDate,
    ExpirationDate,
    LicensePlate,
    QrPayload,
    QualityMark,
    ProcessControlDate,
}

impl LabelData {
    /// Parse a label-data document.
    ///
    /// Accepts both the plain record shape and the legacy feed shape: an
    /// optional `container_label` wrapper, `lpn_1j` for the license plate,
    /// and a nested `qr_code.encoded_string` for the QR payload. Unknown
    /// fields are ignored; missing fields are not an error.
    pub fn from_json(json: &str) -> Result<Self, LabelError> {
        let mut value: Value = serde_json::from_str(json)?;
        let mut record = match value.get_mut("container_label") {
            Some(inner) => inner.take(),
            None => value,
        };
        if let Some(encoded) = record
            .pointer("/qr_code/encoded_string")
            .and_then(Value::as_str)
            .map(str::to_owned)
        {
            record["qrPayload"] = Value::String(encoded);
        }
        Ok(serde_json::from_value(record)?)
    }

    /// Raw field lookup. `None` means absent; bindings substitute their
    /// default for both `None` and empty strings.
    pub fn get(&self, field: Field) -> Option<&str> {
        let slot = match field {
            Field::ShipFromName => &self.ship_from.name,
            Field::ShipFromAddress => &self.ship_from.address,
            Field::SupplierCode => &self.ship_from.supplier_code,
            Field::CountryOfOrigin => &self.ship_from.country_of_origin,
            Field::ShipToName => &self.ship_to.name,
            Field::ShipToAddress => &self.ship_to.address,
            Field::Plant => &self.ship_to.plant,
            Field::StorageLocation => &self.ship_to.storage_location,
            Field::PartNumber => &self.part_number,
            Field::PartDescription => &self.part_description,
            Field::Quantity => &self.quantity,
            Field::UnitOfMeasure => &self.unit_of_measure,
            Field::PoNumber => &self.po_number,
            Field::PoLineNumber => &self.po_line_number,
            Field::LotNumber => &self.lot_number,
            Field::ProductionDate => &self.production_date,
            Field::ExpirationDate => &self.expiration_date,
            Field::LicensePlate => &self.license_plate_number,
            Field::QrPayload => &self.qr_payload,
            Field::QualityMark => &self.quality_mark,
            Field::ProcessControlDate => &self.process_control_date,
        };
        slot.as_deref()
    }
}
