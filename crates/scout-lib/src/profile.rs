//! Search profiles
//!
//! A profile bundles the compiled-in search thresholds, the cost model
//! constants and the GPU name filters for one workload.

use serde::Serialize;

use crate::cost::CostParams;

/// Hours in the 30-day month used to amortize monthly storage prices
pub const HOURS_PER_MONTH: f64 = 30.0 * 24.0;

/// Amount added on top of the base price when bidding on interruptible offers
pub const DEFAULT_BID_INCREMENT: f64 = 0.01;

/// Compiled-in search thresholds and cost constants
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchProfile {
    pub name: &'static str,
    /// Minimum per-GPU memory (GB)
    pub min_gpu_ram_gb: u32,
    /// Minimum disk space (GB)
    pub min_disk_space_gb: u32,
    /// Ceiling for both ingress and egress price ($/GB)
    pub max_inet_cost: f64,
    /// Minimum download throughput (Mb/s)
    pub min_inet_down_mbps: u32,
    /// Container footprint whose storage is billed (GB)
    pub container_size_gb: f64,
    /// Data pulled during the first rental hour (GB)
    pub download_volume_gb: f64,
    /// GPU name substrings that are never offered
    pub exclude_gpu_names: &'static [&'static str],
    /// When non-empty, only GPU names containing one of these are offered
    pub target_gpu_keywords: &'static [&'static str],
    /// How many ranked offers to show
    pub result_limit: usize,
    /// `--disk` argument passed when creating an instance (GB)
    pub instance_disk_gb: u32,
    pub bid_increment: f64,
}

impl Default for SearchProfile {
    fn default() -> Self {
        Self::general()
    }
}

impl SearchProfile {
    /// Any GPU with at least 24 GB, for 14B-class image/video models with offloading
    pub fn general() -> Self {
        Self {
            name: "default",
            min_gpu_ram_gb: 24,
            min_disk_space_gb: 120,
            max_inet_cost: 0.002,
            min_inet_down_mbps: 1000,
            container_size_gb: 120.0,
            download_volume_gb: 100.0,
            exclude_gpu_names: &[],
            target_gpu_keywords: &[],
            result_limit: 15,
            instance_disk_gb: 120,
            bid_increment: DEFAULT_BID_INCREMENT,
        }
    }

    /// H100/H200 only, with larger disk and download budgets
    pub fn h100() -> Self {
        Self {
            name: "h100",
            min_gpu_ram_gb: 80,
            min_disk_space_gb: 160,
            max_inet_cost: 0.001,
            min_inet_down_mbps: 1000,
            container_size_gb: 160.0,
            download_volume_gb: 150.0,
            // sm_120 is not supported by the pinned PyTorch build
            exclude_gpu_names: &["RTX 5090"],
            target_gpu_keywords: &["H100", "H200"],
            result_limit: 30,
            instance_disk_gb: 160,
            bid_increment: DEFAULT_BID_INCREMENT,
        }
    }

    /// Look up a profile by name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" | "general" => Some(Self::general()),
            "h100" | "h200" => Some(Self::h100()),
            _ => None,
        }
    }

    /// Filter expression for `search offers`
    pub fn query(&self) -> String {
        format!(
            "gpu_ram >= {} disk_space >= {} inet_down_cost < {} inet_up_cost < {} inet_down >= {}",
            self.min_gpu_ram_gb,
            self.min_disk_space_gb,
            self.max_inet_cost,
            self.max_inet_cost,
            self.min_inet_down_mbps,
        )
    }

    pub fn cost_params(&self) -> CostParams {
        CostParams {
            container_size_gb: self.container_size_gb,
            download_volume_gb: self.download_volume_gb,
        }
    }

    /// Whether a GPU name passes the exclusion list and the target keywords
    ///
    /// Matching ignores case and treats `_` and space alike, since the
    /// marketplace reports both `RTX_5090` and `RTX 5090`.
    pub fn allows_gpu(&self, gpu_name: &str) -> bool {
        let name = normalize_gpu_name(gpu_name);

        if self
            .exclude_gpu_names
            .iter()
            .any(|excluded| name.contains(&normalize_gpu_name(excluded)))
        {
            return false;
        }

        self.target_gpu_keywords.is_empty()
            || self
                .target_gpu_keywords
                .iter()
                .any(|keyword| name.contains(&normalize_gpu_name(keyword)))
    }
}

fn normalize_gpu_name(name: &str) -> String {
    name.replace('_', " ").to_uppercase()
}
