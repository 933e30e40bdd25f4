use scene_repr::{
    common::*,
    config::Config,
    encoder::RepresentationInit,
};

/// Build a scene representation network and run a single forward pass to
/// verify the configured geometry.
#[derive(FromArgs)]
struct Args {
    /// the config file.
    #[argh(option, default = "PathBuf::from(\"config.json5\")")]
    config: PathBuf,
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args: Args = argh::from_env();
    let config = Config::open(&args.config)?;
    let device = config.device;

    let mut vs = VarStore::new(device);
    let init = RepresentationInit::from(&config.model);
    let repr = init.clone().build(&vs.root())?;

    if let Some(model_file) = &config.model_file {
        info!("loading weights from {}", model_file.display());
        vs.load(model_file)?;
    }

    let batch_size = config.batch_size.get() as i64;
    let frame_size = config.frame_size;
    let frames = Tensor::randn(
        &[batch_size, init.frame_channels, frame_size, frame_size],
        (Kind::Float, device),
    );
    let viewpoints = Tensor::randn(
        &[batch_size, init.viewpoint_channels],
        (Kind::Float, device),
    );

    info!(
        "encoding a {}x{}x{}x{} batch with the {:?} network",
        batch_size, init.frame_channels, frame_size, frame_size, config.model.kind
    );
    let output = tch::no_grad(|| repr.forward(&frames, &viewpoints));
    info!("representation shape {:?}", output.size());

    Ok(())
}
