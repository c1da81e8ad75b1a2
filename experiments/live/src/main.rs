use {
    anyhow::bail,
    clap::Parser,
    inference::Engine,
    pipeline::{FolderRenderer, PipelineError, Postprocessor, Preprocessor, Scheduler},
    tokio_util::sync::CancellationToken,
    video::FrameIn,
};

mod args;
mod config;
mod engine;

use {args::Args, config::RunConfig};

async fn run<E: Engine>(
    engine: E,
    config: &RunConfig,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let mut preprocessor =
        Preprocessor::new(engine.input().clone())?.with_channel_order(config.channel_order);
    if let Some(normalize) = &config.normalize {
        preprocessor = preprocessor.with_normalize(normalize.clone());
    }
    let mut scheduler =
        Scheduler::new(engine, config.pipeline.clone())?.with_preprocessor(preprocessor);

    let input = config.input()?;
    let mut source = FrameIn::open_path(input).await?;
    log::info!("reading {:?}", source.config());

    let postprocessor = Postprocessor::new(config.postprocess.clone(), config.model_input.layout);
    let mut renderer = FolderRenderer::new(&config.output, postprocessor, config.format)?;

    match scheduler.run(&mut source, &mut renderer, cancel).await {
        Ok(summary) => {
            println!("{}", summary.report);
            println!(
                "{} frames written to {}, {} dropped, at most {} in flight, {} buffered",
                summary.rendered,
                config.output.display(),
                summary.dropped,
                summary.peak_in_flight,
                summary.peak_buffered
            );
            Ok(())
        }
        Err(PipelineError::Cancelled) => {
            bail!("interrupted after {} frames", renderer.written())
        }
        Err(error) => Err(error.into()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = RunConfig::load(&args)?;

    match &config.log_dir {
        Some(dir) => {
            base::init_file_logger(dir)?;
        }
        None => {
            base::init_stdout_logger();
        }
    }

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("ctrl-c, stopping");
                cancel.cancel();
            }
        }
    });

    match &config.model {
        #[cfg(feature = "onnx")]
        Some(model) => run(engine::onnx_engine(&config, model)?, &config, &cancel).await,
        #[cfg(not(feature = "onnx"))]
        Some(model) => bail!(
            "cannot load {}: built without the onnx feature",
            model.display()
        ),
        None => {
            log::warn!("no model given, using the identity engine");
            run(engine::identity_engine(&config)?, &config, &cancel).await
        }
    }
}
