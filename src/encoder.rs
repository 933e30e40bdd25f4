use crate::{common::*, params};

/// Encodes a batch of (frame, viewpoint) pairs into a representation tensor.
pub trait Representation {
    fn forward(&self, frames: &Tensor, viewpoints: &Tensor) -> Tensor;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepresentationKind {
    #[serde(rename = "tower")]
    Tower,
    #[serde(rename = "pyramid")]
    Pyramid,
}

#[derive(Debug, Clone)]
pub struct RepresentationInit {
    pub frame_channels: i64,
    pub viewpoint_channels: i64,
    pub repr_channels: i64,
    pub kind: RepresentationKind,
    pub pool: bool,
}

impl RepresentationInit {
    pub fn new(frame_channels: i64) -> Self {
        Self {
            frame_channels,
            viewpoint_channels: params::VIEWPOINT_CHANNELS,
            repr_channels: params::REPR_CHANNELS,
            kind: RepresentationKind::Tower,
            pool: true,
        }
    }

    pub fn build<'a, P>(self, path: P) -> Result<Box<dyn Representation + Send>>
    where
        P: Borrow<nn::Path<'a>>,
    {
        let path = path.borrow();
        let Self {
            frame_channels,
            viewpoint_channels,
            repr_channels,
            kind,
            pool,
        } = self;

        let repr: Box<dyn Representation + Send> = match kind {
            RepresentationKind::Tower => Box::new(TowerRepresentation::new(
                path / "tower",
                frame_channels,
                viewpoint_channels,
                repr_channels,
                pool,
            )?),
            RepresentationKind::Pyramid => Box::new(PyramidRepresentation::new(
                path / "pyramid",
                frame_channels,
                viewpoint_channels,
                repr_channels,
            )?),
        };
        Ok(repr)
    }
}

/// Tower architecture: two skip-connected conv blocks, with the viewpoint
/// broadcast over a (repr_channels / 16)^2 grid and merged between them.
/// With `pool` enabled the spatial dimensions are averaged away at the end.
#[derive(Debug)]
pub struct TowerRepresentation {
    repr_channels: i64,
    viewpoint_channels: i64,
    pool: bool,
    conv1: nn::Conv2D,
    conv2: nn::Conv2D,
    conv3: nn::Conv2D,
    conv4: nn::Conv2D,
    conv5: nn::Conv2D,
    conv6: nn::Conv2D,
    conv7: nn::Conv2D,
    conv8: nn::Conv2D,
}

impl TowerRepresentation {
    pub fn new<'a, P>(
        path: P,
        frame_channels: i64,
        viewpoint_channels: i64,
        repr_channels: i64,
        pool: bool,
    ) -> Result<Self>
    where
        P: Borrow<nn::Path<'a>>,
    {
        ensure!(
            repr_channels % params::TOWER_BROADCAST_DIVISOR == 0,
            "repr_channels must be divisible by {}, but is {}",
            params::TOWER_BROADCAST_DIVISOR,
            repr_channels
        );

        let path = path.borrow();
        let conv_config = |padding, stride| nn::ConvConfig {
            padding,
            stride,
            ..Default::default()
        };
        let k = repr_channels;

        let conv1 = nn::conv2d(path / "conv1", frame_channels, k, 2, conv_config(0, 2));
        let conv2 = nn::conv2d(path / "conv2", k, k, 2, conv_config(0, 2));
        let conv3 = nn::conv2d(path / "conv3", k, k / 2, 3, conv_config(1, 1));
        let conv4 = nn::conv2d(path / "conv4", k / 2, k, 2, conv_config(0, 2));
        let conv5 = nn::conv2d(
            path / "conv5",
            k + viewpoint_channels,
            k,
            3,
            conv_config(1, 1),
        );
        let conv6 = nn::conv2d(
            path / "conv6",
            k + viewpoint_channels,
            k / 2,
            3,
            conv_config(1, 1),
        );
        let conv7 = nn::conv2d(path / "conv7", k / 2, k, 3, conv_config(1, 1));
        let conv8 = nn::conv2d(path / "conv8", k, k, 1, conv_config(0, 1));

        Ok(Self {
            repr_channels,
            viewpoint_channels,
            pool,
            conv1,
            conv2,
            conv3,
            conv4,
            conv5,
            conv6,
            conv7,
            conv8,
        })
    }
}

impl Representation for TowerRepresentation {
    fn forward(&self, frames: &Tensor, viewpoints: &Tensor) -> Tensor {
        let batch_size = frames.size()[0];
        let extent = self.repr_channels / params::TOWER_BROADCAST_DIVISOR;
        let broadcast_viewpoints = viewpoints
            .reshape(&[batch_size, self.viewpoint_channels, 1, 1])
            .repeat(&[1, 1, extent, extent]);

        // first skip-connected conv block
        let skip_in = frames.apply(&self.conv1).relu();
        let skip_out = skip_in.apply(&self.conv2).relu();
        let net = skip_in.apply(&self.conv3).relu();
        let net = net.apply(&self.conv4).relu() + skip_out;

        // second skip-connected conv block, on the merged tensor
        let skip_in = Tensor::cat(&[net, broadcast_viewpoints], 1);
        let skip_out = skip_in.apply(&self.conv5).relu();
        let net = skip_in.apply(&self.conv6).relu();
        let net = net.apply(&self.conv7).relu() + skip_out;

        let net = net.apply(&self.conv8).relu();

        if self.pool {
            pool_spatial(&net)
        } else {
            net
        }
    }
}

/// Pyramid architecture: the viewpoint is broadcast to full frame resolution
/// and concatenated up front, then four strided convolutions shrink the
/// spatial extent by 2 * 2 * 2 * 8 while growing the channel depth.
#[derive(Debug)]
pub struct PyramidRepresentation {
    viewpoint_channels: i64,
    conv1: nn::Conv2D,
    conv2: nn::Conv2D,
    conv3: nn::Conv2D,
    conv4: nn::Conv2D,
}

impl PyramidRepresentation {
    pub fn new<'a, P>(
        path: P,
        frame_channels: i64,
        viewpoint_channels: i64,
        repr_channels: i64,
    ) -> Result<Self>
    where
        P: Borrow<nn::Path<'a>>,
    {
        ensure!(
            repr_channels % params::PYRAMID_CHANNEL_DIVISOR == 0,
            "repr_channels must be divisible by {}, but is {}",
            params::PYRAMID_CHANNEL_DIVISOR,
            repr_channels
        );

        let path = path.borrow();
        let conv_config = |padding, stride| nn::ConvConfig {
            padding,
            stride,
            ..Default::default()
        };
        let k = repr_channels;

        let conv1 = nn::conv2d(
            path / "conv1",
            frame_channels + viewpoint_channels,
            k / 8,
            2,
            conv_config(0, 2),
        );
        let conv2 = nn::conv2d(path / "conv2", k / 8, k / 4, 2, conv_config(0, 2));
        let conv3 = nn::conv2d(path / "conv3", k / 4, k / 2, 2, conv_config(0, 2));
        let conv4 = nn::conv2d(path / "conv4", k / 2, k, 8, conv_config(0, 8));

        Ok(Self {
            viewpoint_channels,
            conv1,
            conv2,
            conv3,
            conv4,
        })
    }
}

impl Representation for PyramidRepresentation {
    fn forward(&self, frames: &Tensor, viewpoints: &Tensor) -> Tensor {
        let (batch_size, _channels, height, width) = frames.size4().unwrap();
        let broadcast_viewpoints = viewpoints
            .reshape(&[batch_size, self.viewpoint_channels, 1, 1])
            .repeat(&[1, 1, height, width]);

        let net = Tensor::cat(&[frames, &broadcast_viewpoints], 1);
        let net = net.apply(&self.conv1).relu();
        let net = net.apply(&self.conv2).relu();
        let net = net.apply(&self.conv3).relu();
        net.apply(&self.conv4).relu()
    }
}

// reduce mean of height, width dimension
fn pool_spatial(net: &Tensor) -> Tensor {
    let (batch_size, channels, height, width) = net.size4().unwrap();
    net.view(&[batch_size, channels, height * width][..])
        .mean_dim(&[2], false, Kind::Float)
        .view(&[batch_size, channels, 1, 1][..])
}
