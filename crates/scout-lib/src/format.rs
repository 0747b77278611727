//! Fixed-width offer table
//!
//! Every offer renders to exactly one terminal row: cells are truncated to
//! their column width and padded, never wrapped.

use tabled::Tabled;

use crate::models::PricedOffer;

/// Column titles and widths, in display order
pub const COLUMNS: [(&str, usize); 12] = [
    ("#", 3),
    ("ID", 9),
    ("Type", 4),
    ("GPU", 16),
    ("VRAM", 7),
    ("Est$/h", 8),
    ("Base$/h", 8),
    ("Down", 8),
    ("Up", 8),
    ("Loc", 12),
    ("Rel%", 5),
    ("TFLOPS", 7),
];

/// Placeholder for absent values
const NOT_AVAILABLE: &str = "N/A";

/// Display cells for one ranked offer
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct OfferRow {
    #[tabled(rename = "#")]
    pub rank: String,
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "GPU")]
    pub gpu: String,
    #[tabled(rename = "VRAM")]
    pub vram: String,
    #[tabled(rename = "Est$/h")]
    pub estimated: String,
    #[tabled(rename = "Base$/h")]
    pub base: String,
    #[tabled(rename = "Down")]
    pub down: String,
    #[tabled(rename = "Up")]
    pub up: String,
    #[tabled(rename = "Loc")]
    pub location: String,
    #[tabled(rename = "Rel%")]
    pub reliability: String,
    #[tabled(rename = "TFLOPS")]
    pub tflops: String,
}

impl OfferRow {
    /// Build the row for the offer at 1-based `rank`
    pub fn new(rank: usize, priced: &PricedOffer) -> Self {
        let offer = &priced.offer;
        let cells = [
            rank.to_string(),
            offer.id.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            offer.instance_type.code().to_string(),
            offer.display_gpu_name(),
            format_vram(offer.num_gpus, offer.gpu_ram),
            format_price(priced.estimated_total_cost),
            format_price(offer.base_price()),
            format_throughput(offer.inet_down),
            format_throughput(offer.inet_up),
            offer
                .geolocation
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            format!("{:.1}", offer.reliability * 100.0),
            format_tflops(offer.total_flops),
        ];

        let [rank, id, kind, gpu, vram, estimated, base, down, up, location, reliability, tflops] =
            truncate_cells(cells);

        Self {
            rank,
            id,
            kind,
            gpu,
            vram,
            estimated,
            base,
            down,
            up,
            location,
            reliability,
            tflops,
        }
    }

    fn cells(&self) -> [&str; 12] {
        [
            &self.rank,
            &self.id,
            &self.kind,
            &self.gpu,
            &self.vram,
            &self.estimated,
            &self.base,
            &self.down,
            &self.up,
            &self.location,
            &self.reliability,
            &self.tflops,
        ]
    }
}

/// Rows for a ranked slice, numbered from 1
pub fn offer_rows(offers: &[PricedOffer]) -> Vec<OfferRow> {
    offers
        .iter()
        .enumerate()
        .map(|(idx, offer)| OfferRow::new(idx + 1, offer))
        .collect()
}

/// Total width of a rendered row
pub fn table_width() -> usize {
    COLUMNS.iter().map(|(_, width)| width).sum::<usize>() + COLUMNS.len() - 1
}

pub fn format_header() -> String {
    join_padded(COLUMNS.map(|(title, _)| title))
}

pub fn format_divider() -> String {
    "-".repeat(table_width())
}

/// Render one row at the fixed column widths
pub fn format_row(row: &OfferRow) -> String {
    join_padded(row.cells())
}

/// `"{num_gpus}x{gb}G"`
///
/// The marketplace reports `gpu_ram` in GB for some hosts and MB for others.
/// Values below 1000 are taken as GB and anything from 1000 up as MB, so
/// exactly 1000 renders as `0G`. This is a heuristic: an MB value under 1000
/// or a GB value of 1000 or more displays wrong.
pub fn format_vram(num_gpus: u32, gpu_ram: f64) -> String {
    let gb = if gpu_ram < 1000.0 {
        gpu_ram
    } else {
        gpu_ram / 1024.0
    };
    format!("{}x{}G", num_gpus, gb.max(0.0) as u64)
}

/// Throughput in Mb/s, switching to Gb/s at 1000
pub fn format_throughput(mbps: f64) -> String {
    if mbps >= 1000.0 {
        format!("{:.1}Gb/s", mbps / 1000.0)
    } else {
        format!("{}Mb/s", mbps.max(0.0) as u64)
    }
}

pub fn format_price(amount: f64) -> String {
    format!("${:.4}", amount)
}

fn format_tflops(total_flops: Option<f64>) -> String {
    match total_flops {
        Some(flops) if flops != 0.0 => format!("{:.1}", flops),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Cut to at most `width` characters
pub fn truncate(value: &str, width: usize) -> String {
    value.chars().take(width).collect()
}

fn truncate_cells(cells: [String; 12]) -> [String; 12] {
    let mut idx = 0;
    cells.map(|cell| {
        let width = COLUMNS[idx].1;
        idx += 1;
        truncate(&cell, width)
    })
}

fn join_padded(cells: [&str; 12]) -> String {
    cells
        .iter()
        .zip(COLUMNS.iter())
        .map(|(cell, (_, width))| format!("{:<width$}", truncate(cell, *width), width = *width))
        .collect::<Vec<_>>()
        .join(" ")
}
