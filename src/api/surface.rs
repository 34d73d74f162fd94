use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::core::{
    AggregationClassifier, DataReshaper, OutputsMap, PlotConfig, PlotDefinition, PlotLayout,
    PreparedData, RawSeriesData, ReshapeRequest, annotate_layout,
};
use crate::error::{PlotError, PlotResult};
use crate::render::{PlotFrame, PlotRenderer};

use super::{PipelineStats, PlotSurfaceConfig, ReshapePipeline};

pub type EditCallback = Box<dyn Fn() + Send + Sync>;

/// Inputs the host hands to a plot surface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotProps {
    pub data: RawSeriesData,
    pub layout: PlotLayout,
    pub config: PlotConfig,
    pub current_step: usize,
    pub hide_step: Option<bool>,
    /// Missing outputs behave like an empty map.
    pub outputs: Option<OutputsMap>,
    pub definition: PlotDefinition,
    pub readonly: bool,
}

/// Header rendered above the plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleBar<'a> {
    pub title: &'a str,
    pub show_edit_button: bool,
    pub show_spinner: bool,
}

/// Display state of one plot bound to live output series.
///
/// Derived state is recomputed only when the props it depends on change:
/// the display layout on layout/step/hide-step, the display config on config,
/// and the prepared data (through the reshape pipeline) on
/// data/definition/outputs/step.
pub struct PlotSurface<R: PlotRenderer> {
    renderer: R,
    config: PlotSurfaceConfig,
    props: PlotProps,
    on_edit: Option<EditCallback>,
    display_layout: PlotLayout,
    display_config: PlotConfig,
    loading: bool,
    snapshot: ReshapeRequest,
    pipeline: ReshapePipeline,
    prepared: watch::Receiver<Option<Arc<PreparedData>>>,
}

impl<R: PlotRenderer> PlotSurface<R> {
    /// Builds the surface and submits the first reshape.
    ///
    /// Fails with [`PlotError::RuntimeUnavailable`] outside of a tokio runtime.
    pub fn new(
        renderer: R,
        props: PlotProps,
        classifier: Arc<dyn AggregationClassifier>,
        config: PlotSurfaceConfig,
    ) -> PlotResult<Self> {
        config.validate()?;

        let reshaper = DataReshaper::new(classifier).with_options(config.reshape);
        let pipeline = ReshapePipeline::spawn(Arc::new(reshaper))?;
        let (sender, prepared) = watch::channel(None);
        pipeline.subscribe(move |data| {
            sender.send_replace(Some(data));
        });

        let display_layout = annotate_layout(
            &props.layout,
            props.current_step,
            props.hide_step.unwrap_or(false),
            &config.step_marker,
        );
        let snapshot = ReshapeRequest {
            definition: Arc::new(props.definition.clone()),
            outputs: Arc::new(props.outputs.clone().unwrap_or_default()),
            data: Arc::new(props.data.clone()),
            current_step: props.current_step,
        };
        let mut surface = Self {
            renderer,
            display_config: props.config.clone(),
            config,
            props,
            on_edit: None,
            display_layout,
            loading: true,
            snapshot,
            pipeline,
            prepared,
        };

        if surface.config.resize.resize_on_observe {
            surface.renderer.resize();
        }
        surface.warn_if_out_of_lockstep();
        surface.submit_reshape();
        Ok(surface)
    }

    #[must_use]
    pub fn with_on_edit(mut self, on_edit: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_edit = Some(Box::new(on_edit));
        self
    }

    pub fn set_on_edit(&mut self, on_edit: Option<EditCallback>) {
        self.on_edit = on_edit;
    }

    /// Applies new props, re-deriving only what depends on changed fields.
    pub fn set_props(&mut self, props: PlotProps) {
        let step_changed = props.current_step != self.props.current_step;
        let layout_changed = step_changed
            || props.hide_step != self.props.hide_step
            || props.layout != self.props.layout;
        let config_changed = props.config != self.props.config;

        let mut reshape_changed = step_changed;
        if props.data != self.props.data {
            self.snapshot.data = Arc::new(props.data.clone());
            reshape_changed = true;
        }
        if props.definition != self.props.definition {
            self.snapshot.definition = Arc::new(props.definition.clone());
            reshape_changed = true;
        }
        if props.outputs != self.props.outputs {
            self.snapshot.outputs = Arc::new(props.outputs.clone().unwrap_or_default());
            reshape_changed = true;
        }
        self.snapshot.current_step = props.current_step;
        self.props = props;

        trace!(
            layout_changed,
            config_changed,
            reshape_changed,
            "plot surface props updated"
        );
        if layout_changed {
            self.display_layout = annotate_layout(
                &self.props.layout,
                self.props.current_step,
                self.props.hide_step.unwrap_or(false),
                &self.config.step_marker,
            );
        }
        if config_changed {
            self.display_config = self.props.config.clone();
        }
        if reshape_changed {
            self.warn_if_out_of_lockstep();
            self.submit_reshape();
        }
    }

    /// Convenience for the common case of only the step advancing.
    pub fn set_current_step(&mut self, current_step: usize) {
        let mut props = self.props.clone();
        props.current_step = current_step;
        self.set_props(props);
    }

    #[must_use]
    pub fn props(&self) -> &PlotProps {
        &self.props
    }

    #[must_use]
    pub fn display_layout(&self) -> &PlotLayout {
        &self.display_layout
    }

    #[must_use]
    pub fn display_config(&self) -> &PlotConfig {
        &self.display_config
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Latest pipeline output, `None` until the first reshape completes.
    #[must_use]
    pub fn prepared_data(&self) -> Option<Arc<PreparedData>> {
        self.prepared.borrow().clone()
    }

    /// Waits for the next pipeline output not yet observed.
    pub async fn changed(&mut self) -> PlotResult<Arc<PreparedData>> {
        self.prepared
            .changed()
            .await
            .map_err(|_| PlotError::PipelineDisposed)?;
        self.prepared
            .borrow_and_update()
            .clone()
            .ok_or(PlotError::PipelineDisposed)
    }

    /// Draws the current frame; an empty frame until data is prepared.
    pub fn render(&mut self) -> PlotResult<()> {
        let prepared = self.prepared_data();
        let frame = PlotFrame {
            data: prepared.as_deref().map_or(&[][..], Vec::as_slice),
            layout: &self.display_layout,
            config: &self.display_config,
        };
        let outcome = match self.renderer.draw(frame) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "plot draw failed");
                return Err(err);
            }
        };

        self.on_after_plot();
        if let Some(layout) = outcome.layout {
            self.on_update(layout);
        }
        Ok(())
    }

    /// The library finished drawing.
    pub fn on_after_plot(&mut self) {
        if self.loading {
            self.loading = false;
            debug!(title = %self.props.definition.title, "first plot draw completed");
        }
    }

    /// The library reported the layout it initialized with.
    pub fn on_initialized(&mut self, layout: PlotLayout) {
        trace!("adopting initial library layout");
        self.display_layout = layout;
    }

    /// The library changed the layout on its own (autoscale, legend toggle).
    pub fn on_update(&mut self, layout: PlotLayout) {
        trace!("adopting updated library layout");
        self.display_layout = layout;
    }

    /// The observed container changed size.
    pub fn handle_resize(&mut self) {
        self.renderer.resize();
    }

    #[must_use]
    pub fn title_bar(&self) -> TitleBar<'_> {
        TitleBar {
            title: &self.props.definition.title,
            show_edit_button: !self.props.readonly,
            show_spinner: self.loading,
        }
    }

    /// Invokes the edit callback. Returns whether one was invoked.
    pub fn request_edit(&self) -> bool {
        if self.props.readonly {
            return false;
        }
        match &self.on_edit {
            Some(on_edit) => {
                on_edit();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn pipeline_stats(&self) -> PipelineStats {
        self.pipeline.stats()
    }

    /// Stops reshaping; no prepared data is delivered afterwards.
    pub fn dispose(&self) {
        self.pipeline.dispose();
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    fn submit_reshape(&self) {
        if let Err(err) = self.pipeline.submit(self.snapshot.clone()) {
            warn!(error = %err, "skipping reshape submission");
        }
    }

    fn warn_if_out_of_lockstep(&self) {
        if let Err(err) = self.props.definition.check_lockstep(&self.props.data) {
            warn!(error = %err, "definition bindings and series data are out of lockstep");
        }
    }
}
