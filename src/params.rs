// input parameters
pub const VIEWPOINT_CHANNELS: i64 = 7; // x, y, z, cos(yaw), sin(yaw), cos(pitch), sin(pitch)
pub const FRAME_CHANNELS: i64 = 3;

// hyper-parameters: scene representation
pub const REPR_CHANNELS: i64 = 256;

// The tower broadcasts the viewpoint over a (repr_channels / 16)^2 grid and
// pools with the same extent, so repr_channels must be a multiple of 16.
pub const TOWER_BROADCAST_DIVISOR: i64 = 16;

// The pyramid channel schedule starts at repr_channels / 8.
pub const PYRAMID_CHANNEL_DIVISOR: i64 = 8;

// product of the pyramid strides 2 * 2 * 2 * 8
pub const PYRAMID_DOWNSCALE: i64 = 32;
