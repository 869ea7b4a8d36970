/// Frame rate targeted on regular hardware.
pub const DEFAULT_TARGET_FPS: u32 = 60;
/// Frame rate targeted on hardware classified as low-end.
pub const LOW_END_TARGET_FPS: u32 = 30;

const MIN_CORES: usize = 4;
const MIN_MEMORY_GB: f64 = 4.0;
const MOBILE_MARKERS: &[&str] = &[
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
    "mobile",
];

/// Capabilities reported by the host. Unknown values never count against the device.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DeviceProfile {
    /// Logical CPU core count.
    pub cpu_cores: Option<usize>,
    /// Host user-agent string.
    pub user_agent: Option<String>,
    /// Reported device memory in gigabytes.
    pub device_memory_gb: Option<f64>,
}

impl DeviceProfile {
    /// Probe the current process.
    pub fn detect() -> Self {
        Self {
            cpu_cores: std::thread::available_parallelism()
                .ok()
                .map(std::num::NonZeroUsize::get),
            user_agent: None,
            device_memory_gb: None,
        }
    }

    /// `true` when the user agent names a mobile platform.
    pub fn is_mobile(&self) -> bool {
        self.user_agent.as_deref().is_some_and(|ua| {
            let ua = ua.to_ascii_lowercase();
            MOBILE_MARKERS.iter().any(|m| ua.contains(m))
        })
    }

    /// Heuristic low-end classification: few cores, a mobile user agent, or little memory.
    pub fn is_low_end(&self) -> bool {
        self.cpu_cores.is_some_and(|c| c < MIN_CORES)
            || self.is_mobile()
            || self.device_memory_gb.is_some_and(|m| m < MIN_MEMORY_GB)
    }
}

/// Frame pacing decided once when an engine is constructed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FramePolicy {
    /// Whether the device was classified as low-end.
    pub low_end: bool,
    /// Target frames per second.
    pub target_fps: u32,
    /// Minimum milliseconds between accepted frames. Zero disables throttling.
    pub min_frame_interval_ms: f64,
}

impl FramePolicy {
    /// Classify `profile` and derive the pacing policy.
    pub fn for_device(profile: &DeviceProfile) -> Self {
        if profile.is_low_end() {
            Self {
                low_end: true,
                target_fps: LOW_END_TARGET_FPS,
                min_frame_interval_ms: 1000.0 / f64::from(LOW_END_TARGET_FPS),
            }
        } else {
            Self {
                low_end: false,
                target_fps: DEFAULT_TARGET_FPS,
                min_frame_interval_ms: 0.0,
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/device.rs"]
mod tests;
