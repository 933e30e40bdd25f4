pub use anyhow::{bail, ensure, format_err, Error, Result};
pub use argh::FromArgs;
pub use log::{debug, error, info, warn};
pub use serde::{
    de::Error as DeserializeError, ser::Error as SerializeError, Deserialize, Deserializer,
    Serialize, Serializer,
};
pub use std::{
    borrow::Borrow,
    fs,
    path::{Path, PathBuf},
};
pub use tch::{
    nn::{self, Conv2D, ConvConfig, VarStore},
    Device, Kind, Tensor,
};
