//! Core data models for marketplace offers

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Marketplace category an offer was returned under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstanceCategory {
    /// Fixed hourly price, not reclaimable
    OnDemand,
    /// Bid-priced, may be reclaimed by a higher bidder
    Interruptible,
}

impl InstanceCategory {
    /// Short code shown in the offer table
    pub fn code(&self) -> &'static str {
        match self {
            Self::OnDemand => "OND",
            Self::Interruptible => "BID",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnDemand => "on-demand",
            Self::Interruptible => "interruptible",
        }
    }
}

impl fmt::Display for InstanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One marketplace listing
///
/// Optional numeric fields are already defaulted to zero here, so every
/// computation over an `Offer` is total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Offer {
    pub id: Option<String>,
    pub instance_type: InstanceCategory,
    pub gpu_name: Option<String>,
    pub num_gpus: u32,
    /// Per-GPU memory; the marketplace mixes GB and MB here
    pub gpu_ram: f64,
    pub dph: Option<f64>,
    pub dph_total: Option<f64>,
    /// $/GB/month
    pub storage_cost: f64,
    /// $/GB
    pub inet_down_cost: f64,
    /// $/GB
    pub inet_up_cost: f64,
    /// Mb/s
    pub inet_down: f64,
    /// Mb/s
    pub inet_up: f64,
    pub geolocation: Option<String>,
    /// Fraction in 0..=1
    pub reliability: f64,
    /// TFLOPS
    pub total_flops: Option<f64>,
}

impl Offer {
    /// Build an offer from one raw payload element
    pub fn from_raw(raw: RawOffer, category: InstanceCategory) -> Self {
        Self {
            id: raw.id.or(raw.ask_contract_id),
            instance_type: category,
            gpu_name: raw.gpu_name,
            num_gpus: raw.num_gpus.map(count_from_f64).unwrap_or(0),
            gpu_ram: raw.gpu_ram.unwrap_or(0.0),
            dph: raw.dph,
            dph_total: raw.dph_total,
            storage_cost: raw.storage_cost.unwrap_or(0.0),
            inet_down_cost: raw.inet_down_cost.unwrap_or(0.0),
            inet_up_cost: raw.inet_up_cost.unwrap_or(0.0),
            inet_down: raw.inet_down.unwrap_or(0.0),
            inet_up: raw.inet_up.unwrap_or(0.0),
            geolocation: raw.geolocation,
            reliability: raw.reliability.unwrap_or(0.0),
            total_flops: raw.total_flops,
        }
    }

    /// Hourly base price: `dph_total`, else `dph`, else zero
    pub fn base_price(&self) -> f64 {
        self.dph_total.or(self.dph).map(non_negative).unwrap_or(0.0)
    }

    /// Display name with underscores normalized to spaces
    pub fn display_gpu_name(&self) -> String {
        self.gpu_name
            .as_deref()
            .unwrap_or("Unknown")
            .replace('_', " ")
    }
}

/// An offer with its estimated hourly cost attached
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedOffer {
    #[serde(flatten)]
    pub offer: Offer,
    pub estimated_total_cost: f64,
}

/// Marketplace payload element as returned by `search offers --raw`
///
/// Every field tolerates absence, `null` and wrong JSON types; anything that
/// is not usable decodes to `None`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOffer {
    #[serde(deserialize_with = "lenient::identifier")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient::identifier")]
    pub ask_contract_id: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub gpu_name: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub num_gpus: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub gpu_ram: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub dph: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub dph_total: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub storage_cost: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub inet_down_cost: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub inet_up_cost: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub inet_down: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub inet_up: Option<f64>,
    #[serde(deserialize_with = "lenient::text")]
    pub geolocation: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub reliability: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub total_flops: Option<f64>,
}

/// Clamp negative and non-finite values to zero
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn count_from_f64(value: f64) -> u32 {
    // `as` saturates, and maps NaN to 0
    non_negative(value) as u32
}

mod lenient {
    use super::*;
    use serde_json::Value;

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        })
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    pub fn identifier<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) if !s.is_empty() => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> Offer {
        let raw: RawOffer = serde_json::from_value(value).unwrap();
        Offer::from_raw(raw, InstanceCategory::OnDemand)
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let offer = decode(json!({}));
        assert_eq!(offer.id, None);
        assert_eq!(offer.num_gpus, 0);
        assert_eq!(offer.gpu_ram, 0.0);
        assert_eq!(offer.storage_cost, 0.0);
        assert_eq!(offer.reliability, 0.0);
        assert_eq!(offer.base_price(), 0.0);
    }

    #[test]
    fn test_null_and_wrong_types_are_treated_as_absent() {
        let offer = decode(json!({
            "id": null,
            "gpu_name": 42,
            "num_gpus": "two",
            "storage_cost": null,
            "inet_down": [1, 2],
            "reliability": "0.98"
        }));
        assert_eq!(offer.id, None);
        assert_eq!(offer.gpu_name, None);
        assert_eq!(offer.num_gpus, 0);
        assert_eq!(offer.storage_cost, 0.0);
        assert_eq!(offer.inet_down, 0.0);
        assert!((offer.reliability - 0.98).abs() < 1e-9);
    }

    #[test]
    fn test_numeric_id_is_kept_verbatim() {
        let offer = decode(json!({ "id": 12345678 }));
        assert_eq!(offer.id.as_deref(), Some("12345678"));
    }

    #[test]
    fn test_ask_contract_id_fallback() {
        let offer = decode(json!({ "ask_contract_id": 987 }));
        assert_eq!(offer.id.as_deref(), Some("987"));

        let offer = decode(json!({ "id": 1, "ask_contract_id": 987 }));
        assert_eq!(offer.id.as_deref(), Some("1"));
    }

    #[test]
    fn test_base_price_prefers_dph_total() {
        let offer = decode(json!({ "dph": 0.40, "dph_total": 0.45 }));
        assert_eq!(offer.base_price(), 0.45);

        let offer = decode(json!({ "dph": 0.40 }));
        assert_eq!(offer.base_price(), 0.40);

        let offer = decode(json!({ "dph": 0.40, "dph_total": null }));
        assert_eq!(offer.base_price(), 0.40);
    }

    #[test]
    fn test_negative_price_is_clamped() {
        let offer = decode(json!({ "dph_total": -1.0 }));
        assert_eq!(offer.base_price(), 0.0);
    }

    #[test]
    fn test_display_gpu_name() {
        let offer = decode(json!({ "gpu_name": "RTX_4090" }));
        assert_eq!(offer.display_gpu_name(), "RTX 4090");
        assert_eq!(decode(json!({})).display_gpu_name(), "Unknown");
    }

    #[test]
    fn test_category_serializes_kebab_case() {
        let value = serde_json::to_value(InstanceCategory::OnDemand).unwrap();
        assert_eq!(value, json!("on-demand"));
        assert_eq!(InstanceCategory::Interruptible.code(), "BID");
    }
}
