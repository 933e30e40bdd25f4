use crate::{
    common::*,
    encoder::{RepresentationInit, RepresentationKind},
    params,
};
use std::num::NonZeroUsize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model_file: Option<PathBuf>,
    pub batch_size: NonZeroUsize,
    #[serde(default = "default_frame_size")]
    pub frame_size: i64,
    #[serde(
        serialize_with = "serialize_device",
        deserialize_with = "deserialize_device",
        default = "default_device"
    )]
    pub device: Device,
    pub model: ModelConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub kind: RepresentationKind,
    #[serde(default = "default_frame_channels")]
    pub frame_channels: i64,
    #[serde(default = "default_viewpoint_channels")]
    pub viewpoint_channels: i64,
    #[serde(default = "default_repr_channels")]
    pub repr_channels: i64,
    #[serde(default = "default_pool")]
    pub pool: bool,
}

impl From<&ModelConfig> for RepresentationInit {
    fn from(config: &ModelConfig) -> Self {
        Self {
            frame_channels: config.frame_channels,
            viewpoint_channels: config.viewpoint_channels,
            repr_channels: config.repr_channels,
            kind: config.kind,
            pool: config.pool,
        }
    }
}

fn default_frame_size() -> i64 {
    64
}

fn default_frame_channels() -> i64 {
    params::FRAME_CHANNELS
}

fn default_viewpoint_channels() -> i64 {
    params::VIEWPOINT_CHANNELS
}

fn default_repr_channels() -> i64 {
    params::REPR_CHANNELS
}

fn default_pool() -> bool {
    true
}

fn default_device() -> Device {
    Device::cuda_if_available()
}

fn serialize_device<S>(device: &Device, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let text = match device {
        Device::Cpu => "cpu".into(),
        Device::Cuda(n) => format!("cuda({})", n),
    };
    text.serialize(serializer)
}

fn deserialize_device<'de, D>(deserializer: D) -> Result<Device, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    let device = match name.as_str() {
        "cpu" => Device::Cpu,
        _ => {
            let prefix = "cuda(";
            let suffix = ")";
            if name.starts_with(prefix) && name.ends_with(suffix) {
                let number: usize = name[(prefix.len())..(name.len() - suffix.len())]
                    .parse()
                    .map_err(|_err| D::Error::custom(format!("invalid device name {}", name)))?;
                Device::Cuda(number)
            } else {
                return Err(D::Error::custom(format!("invalid device name {}", name)));
            }
        }
    };
    Ok(device)
}
