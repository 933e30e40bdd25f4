use scene_repr::encoder::{
    PyramidRepresentation, Representation, RepresentationInit, RepresentationKind,
    TowerRepresentation,
};
use tch::{nn, Device, Kind, Tensor};

const FRAME_CHANNELS: i64 = 3;
const VIEWPOINT_CHANNELS: i64 = 7;
const REPR_CHANNELS: i64 = 256;

fn random_batch(batch_size: i64, frame_size: i64) -> (Tensor, Tensor) {
    let frames = Tensor::randn(
        &[batch_size, FRAME_CHANNELS, frame_size, frame_size],
        (Kind::Float, Device::Cpu),
    );
    let viewpoints = Tensor::randn(
        &[batch_size, VIEWPOINT_CHANNELS],
        (Kind::Float, Device::Cpu),
    );
    (frames, viewpoints)
}

#[test]
fn tower_pool_collapses_spatial_extent() {
    let vs = nn::VarStore::new(Device::Cpu);
    let net = TowerRepresentation::new(
        &vs.root(),
        FRAME_CHANNELS,
        VIEWPOINT_CHANNELS,
        REPR_CHANNELS,
        true,
    )
    .unwrap();

    let (frames, viewpoints) = random_batch(1, 64);
    let output = net.forward(&frames, &viewpoints);
    assert_eq!(output.size(), vec![1, REPR_CHANNELS, 1, 1]);
}

#[test]
fn tower_keeps_quarter_resolution_without_pool() {
    let vs = nn::VarStore::new(Device::Cpu);
    let net = TowerRepresentation::new(
        &vs.root(),
        FRAME_CHANNELS,
        VIEWPOINT_CHANNELS,
        REPR_CHANNELS,
        false,
    )
    .unwrap();

    let (frames, viewpoints) = random_batch(1, 64);
    let output = net.forward(&frames, &viewpoints);
    assert_eq!(output.size(), vec![1, REPR_CHANNELS, 16, 16]);
}

#[test]
fn pyramid_downscales_by_32() {
    let vs = nn::VarStore::new(Device::Cpu);
    let net = PyramidRepresentation::new(
        &vs.root(),
        FRAME_CHANNELS,
        VIEWPOINT_CHANNELS,
        REPR_CHANNELS,
    )
    .unwrap();

    let (frames, viewpoints) = random_batch(1, 64);
    let output = net.forward(&frames, &viewpoints);
    assert_eq!(output.size(), vec![1, REPR_CHANNELS, 2, 2]);
}

#[test]
fn batch_dimension_is_preserved() {
    let vs = nn::VarStore::new(Device::Cpu);
    let tower = TowerRepresentation::new(
        &vs.root() / "tower",
        FRAME_CHANNELS,
        VIEWPOINT_CHANNELS,
        REPR_CHANNELS,
        true,
    )
    .unwrap();
    let pyramid = PyramidRepresentation::new(
        &vs.root() / "pyramid",
        FRAME_CHANNELS,
        VIEWPOINT_CHANNELS,
        REPR_CHANNELS,
    )
    .unwrap();

    for batch_size in [1, 3, 5] {
        let (frames, viewpoints) = random_batch(batch_size, 64);
        assert_eq!(tower.forward(&frames, &viewpoints).size()[0], batch_size);
        assert_eq!(pyramid.forward(&frames, &viewpoints).size()[0], batch_size);
    }
}

#[test]
fn forward_is_deterministic() {
    let vs = nn::VarStore::new(Device::Cpu);
    let net = TowerRepresentation::new(
        &vs.root(),
        FRAME_CHANNELS,
        VIEWPOINT_CHANNELS,
        REPR_CHANNELS,
        true,
    )
    .unwrap();

    let (frames, viewpoints) = random_batch(2, 64);
    let first = net.forward(&frames, &viewpoints);
    let second = net.forward(&frames, &viewpoints);

    let max_diff = (first - second).abs().max().double_value(&[]);
    assert_eq!(max_diff, 0.0);
}

#[test]
fn tower_rejects_unaligned_repr_channels() {
    let vs = nn::VarStore::new(Device::Cpu);
    let result = TowerRepresentation::new(
        &vs.root(),
        FRAME_CHANNELS,
        VIEWPOINT_CHANNELS,
        100,
        true,
    );
    assert!(result.is_err());
}

#[test]
fn pyramid_rejects_unaligned_repr_channels() {
    let vs = nn::VarStore::new(Device::Cpu);
    let result =
        PyramidRepresentation::new(&vs.root(), FRAME_CHANNELS, VIEWPOINT_CHANNELS, 100);
    assert!(result.is_err());
}

// smaller repr_channels shrink the viewpoint grid, so the matching input
// resolution shrinks with it: H = 4 * (repr_channels / 16)
#[test]
fn tower_follows_alternate_geometry() {
    let vs = nn::VarStore::new(Device::Cpu);
    let net = TowerRepresentation::new(
        &vs.root(),
        FRAME_CHANNELS,
        VIEWPOINT_CHANNELS,
        128,
        true,
    )
    .unwrap();

    let (frames, viewpoints) = random_batch(1, 32);
    let output = net.forward(&frames, &viewpoints);
    assert_eq!(output.size(), vec![1, 128, 1, 1]);
}

#[test]
fn init_builds_selected_kind() {
    let vs = nn::VarStore::new(Device::Cpu);

    let mut init = RepresentationInit::new(FRAME_CHANNELS);
    init.kind = RepresentationKind::Pyramid;
    let net = init.build(&vs.root()).unwrap();

    let (frames, viewpoints) = random_batch(2, 64);
    let output = net.forward(&frames, &viewpoints);
    assert_eq!(output.size(), vec![2, REPR_CHANNELS, 2, 2]);
}

#[test]
fn outputs_are_rectified() {
    let vs = nn::VarStore::new(Device::Cpu);
    let net = PyramidRepresentation::new(
        &vs.root(),
        FRAME_CHANNELS,
        VIEWPOINT_CHANNELS,
        REPR_CHANNELS,
    )
    .unwrap();

    let (frames, viewpoints) = random_batch(2, 64);
    let min = net
        .forward(&frames, &viewpoints)
        .min()
        .double_value(&[]);
    assert!(min >= 0.0);
}
