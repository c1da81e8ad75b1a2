use {
    crate::{
        ErrorPolicy, FailureKind, PipelineConfig, PipelineError, Preprocessor, Renderer,
        ReorderBuffer, ThroughputMeter, ThroughputReport,
    },
    base::Tensor,
    inference::{Engine, InferRequest},
    std::{
        any::Any,
        panic::{AssertUnwindSafe, catch_unwind},
        sync::Arc,
    },
    tokio::task::JoinSet,
    tokio_util::sync::CancellationToken,
    video::{Frame, FrameSource, VideoError},
};

/// What a run delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub rendered: u64,
    /// Frames skipped under `ErrorPolicy::SkipAndContinue`.
    pub dropped: u64,
    /// Most requests that were submitted at the same time.
    pub peak_in_flight: usize,
    /// Most results held back waiting for an earlier frame, at most N-1.
    pub peak_buffered: usize,
    pub report: ThroughputReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Idle,
    Submitted(u64),
    /// Result is waiting in the reorder buffer.
    Completed(u64),
}

struct Slot {
    state: SlotState,
    // taken while the slot is Submitted
    request: Option<Box<dyn InferRequest>>,
}

enum Outcome {
    Output(Frame, Tensor<f32>),
    Failed(FailureKind, String),
}

struct Entry {
    slot: usize,
    outcome: Outcome,
}

// sent back by a finished inference task
struct Completion {
    slot: usize,
    index: u64,
    // None when the request panicked and cannot be reused
    request: Option<Box<dyn InferRequest>>,
    result: Result<(Frame, Tensor<f32>), (FailureKind, String)>,
}

/// Slot table, cursor and buffer of one run, owned by the coordinating task.
struct Run<'a, R> {
    slots: Vec<Slot>,
    tasks: JoinSet<Completion>,
    buffer: ReorderBuffer<Entry>,
    renderer: &'a mut R,
    cancel: &'a CancellationToken,
    policy: ErrorPolicy,
    meter: ThroughputMeter,
    rendered: u64,
    dropped: u64,
    peak_in_flight: usize,
    peak_buffered: usize,
    // lowest failing index seen; no more frames are pulled after it
    failed_at: Option<u64>,
}

impl<R: Renderer> Run<'_, R> {
    fn idle_slot(&self) -> Option<usize> {
        self.slots.iter().position(|slot| slot.state == SlotState::Idle)
    }

    fn submit(&mut self, slot: usize, frame: Frame, preprocessor: &Arc<Preprocessor>) -> Result<(), PipelineError> {
        let index = frame.index;
        let Some(mut request) = self.slots[slot].request.take() else {
            return Err(PipelineError::Config(format!("slot {slot} has no request")));
        };
        let preprocessor = Arc::clone(preprocessor);
        self.tasks.spawn_blocking(move || {
            let blob = match preprocessor.prepare(&frame) {
                Ok(blob) => blob,
                Err(e) => {
                    return Completion {
                        slot,
                        index,
                        request: Some(request),
                        result: Err((FailureKind::ShapeMismatch, e.to_string())),
                    };
                }
            };
            let outcome = catch_unwind(AssertUnwindSafe(|| request.infer(blob)));
            let (request, result) = match outcome {
                Ok(Ok(output)) => (Some(request), Ok((frame, output))),
                Ok(Err(e)) => (Some(request), Err((FailureKind::Inference, e.to_string()))),
                Err(payload) => {
                    let message = format!("request panicked: {}", panic_message(&*payload));
                    (None, Err((FailureKind::Inference, message)))
                }
            };
            Completion {
                slot,
                index,
                request,
                result,
            }
        });
        self.slots[slot].state = SlotState::Submitted(index);
        self.peak_in_flight = self.peak_in_flight.max(self.tasks.len());
        log::trace!("frame {} submitted on slot {}", index, slot);
        Ok(())
    }

    fn complete(&mut self, index: u64, slot: usize, outcome: Outcome) -> Result<(), PipelineError> {
        if let Outcome::Failed(kind, message) = &outcome {
            log::debug!("frame {} failed ({}): {}", index, kind, message);
            if self.policy == ErrorPolicy::FailFast {
                self.failed_at = Some(self.failed_at.map_or(index, |at| at.min(index)));
            }
        }
        self.slots[slot].state = SlotState::Completed(index);
        self.buffer.insert(index, Entry { slot, outcome })?;
        let delivered = self.deliver();
        self.peak_buffered = self.peak_buffered.max(self.buffer.len());
        delivered
    }

    // render or drop everything from the cursor onward that has arrived
    fn deliver(&mut self) -> Result<(), PipelineError> {
        while let Some((index, entry)) = self.buffer.pop_ready() {
            self.slots[entry.slot].state = SlotState::Idle;
            match entry.outcome {
                Outcome::Output(frame, output) => {
                    if self.cancel.is_cancelled() {
                        return Err(PipelineError::Cancelled);
                    }
                    self.renderer
                        .render(&frame, output)
                        .map_err(|error| PipelineError::Render { index, error })?;
                    self.meter.record_frame();
                    self.rendered += 1;
                }
                Outcome::Failed(kind, message) => match self.policy {
                    ErrorPolicy::FailFast => {
                        return Err(PipelineError::Frame {
                            index,
                            kind,
                            message,
                        });
                    }
                    ErrorPolicy::SkipAndContinue => {
                        log::warn!("skipping frame {} ({}): {}", index, kind, message);
                        self.dropped += 1;
                    }
                },
            }
        }
        Ok(())
    }

    fn on_joined<E: Engine>(&mut self, completion: Completion, engine: &E) -> Result<(), PipelineError> {
        let Completion {
            slot,
            index,
            request,
            result,
        } = completion;
        let request = match request {
            Some(request) => request,
            None => {
                log::warn!("request on slot {} panicked at frame {}, replacing it", slot, index);
                engine.create_request()?
            }
        };
        self.slots[slot].request = Some(request);
        let outcome = match result {
            Ok((frame, output)) => Outcome::Output(frame, output),
            Err((kind, message)) => Outcome::Failed(kind, message),
        };
        log::trace!("frame {} completed on slot {}", index, slot);
        self.complete(index, slot, outcome)
    }

    // abort what has not started, wait out what has, and drop every result
    async fn shutdown(&mut self) {
        self.tasks.abort_all();
        while self.tasks.join_next().await.is_some() {}
        self.buffer.clear();
        self.slots.clear();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

/// Drives frames through an engine with at most N requests in flight and
/// renders results strictly in frame order.
pub struct Scheduler<E: Engine> {
    engine: E,
    config: PipelineConfig,
    preprocessor: Arc<Preprocessor>,
}

impl<E: Engine> Scheduler<E> {
    /// Takes ownership of the compiled engine for as long as the scheduler
    /// lives. The preprocessor targets the engine's declared input.
    pub fn new(engine: E, config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let preprocessor = Preprocessor::new(engine.input().clone())
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        Ok(Self {
            engine,
            config,
            preprocessor: Arc::new(preprocessor),
        })
    }

    /// Replaces the default preprocessor, e.g. to add normalization.
    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = Arc::new(preprocessor);
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Releases the engine.
    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Runs `source` to exhaustion.
    ///
    /// Creates one request per slot and releases them all before returning,
    /// whether the run succeeded, failed or was cancelled. After
    /// cancellation nothing more is rendered.
    pub async fn run<S, R>(
        &mut self,
        source: &mut S,
        renderer: &mut R,
        cancel: &CancellationToken,
    ) -> Result<RunSummary, PipelineError>
    where
        S: FrameSource,
        R: Renderer,
    {
        let n = self.config.max_in_flight;
        log::info!(
            "pipeline start: {} slots, engine {} on {}, {:?}",
            n,
            self.engine.name(),
            self.engine.device(),
            self.config.error_policy
        );

        let mut slots = Vec::with_capacity(n);
        for _ in 0..n {
            slots.push(Slot {
                state: SlotState::Idle,
                request: Some(self.engine.create_request()?),
            });
        }

        let mut run = Run {
            slots,
            tasks: JoinSet::new(),
            buffer: ReorderBuffer::new(),
            renderer,
            cancel,
            policy: self.config.error_policy,
            meter: ThroughputMeter::start(),
            rendered: 0,
            dropped: 0,
            peak_in_flight: 0,
            peak_buffered: 0,
            failed_at: None,
        };

        let result = self.drive(&mut run, source).await;
        run.shutdown().await;

        match result {
            Ok(()) => {
                let report = run.meter.finish();
                log::info!("pipeline done: {}, {} dropped", report, run.dropped);
                Ok(RunSummary {
                    rendered: run.rendered,
                    dropped: run.dropped,
                    peak_in_flight: run.peak_in_flight,
                    peak_buffered: run.peak_buffered,
                    report,
                })
            }
            Err(PipelineError::Cancelled) => {
                log::info!("pipeline cancelled after {} frames", run.rendered);
                Err(PipelineError::Cancelled)
            }
            Err(error) => {
                log::error!("pipeline aborted after {} frames: {}", run.rendered, error);
                Err(error)
            }
        }
    }

    async fn drive<S, R>(&self, run: &mut Run<'_, R>, source: &mut S) -> Result<(), PipelineError>
    where
        S: FrameSource,
        R: Renderer,
    {
        let cancel = run.cancel.clone();
        let mut exhausted = false;
        loop {
            // fill idle slots
            while !exhausted && run.failed_at.is_none() {
                let Some(slot) = run.idle_slot() else {
                    break;
                };
                let next = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(PipelineError::Cancelled),
                    next = source.next_frame() => next,
                };
                match next {
                    Ok(Some(frame)) => run.submit(slot, frame, &self.preprocessor)?,
                    Ok(None) => exhausted = true,
                    Err(VideoError::Decode { index, message }) => {
                        run.complete(index, slot, Outcome::Failed(FailureKind::Decode, message))?
                    }
                    Err(error) => return Err(PipelineError::Source(error)),
                }
            }

            if run.tasks.is_empty() {
                run.buffer.finish()?;
                return Ok(());
            }

            let joined = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(PipelineError::Cancelled),
                joined = run.tasks.join_next() => joined,
            };
            match joined {
                Some(Ok(completion)) => run.on_joined(completion, &self.engine)?,
                Some(Err(e)) => {
                    return Err(PipelineError::Engine(inference::InferError::Runtime(format!(
                        "inference task failed: {e}"
                    ))));
                }
                None => {}
            }
        }
    }
}
