//! Scene representation networks for generative query models.
//!
//! Implements the tower and pyramid encoders that condense an
//! (image, viewpoint) pair into a fixed-depth representation tensor.

pub mod common;
pub mod config;
pub mod encoder;
pub mod params;

pub use encoder::{
    PyramidRepresentation, Representation, RepresentationInit, RepresentationKind,
    TowerRepresentation,
};
