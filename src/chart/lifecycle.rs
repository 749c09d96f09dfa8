use std::cell::RefCell;
use std::mem;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::chart::{ChartContainer, ChartOptions, ChartSurface, ResizeSubscription};
use crate::core::{CandleSeries, Viewport};
use crate::error::DashResult;
use crate::render::Renderer;

/// Text shown in place of the surface when there is nothing to draw.
pub const NO_DATA_PLACEHOLDER: &str = "No chart data available";

pub type SharedSurface<R> = Rc<RefCell<ChartSurface<R>>>;

/// Creates the backend renderer for a new surface.
pub trait SurfaceFactory {
    type Renderer: Renderer + 'static;

    fn create_renderer(&mut self, viewport: Viewport) -> DashResult<Self::Renderer>;
}

impl<R, F> SurfaceFactory for F
where
    R: Renderer + 'static,
    F: FnMut(Viewport) -> DashResult<R>,
{
    type Renderer = R;

    fn create_renderer(&mut self, viewport: Viewport) -> DashResult<R> {
        self(viewport)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartPhase {
    Uninitialized,
    /// Data is waiting for the container (or the backend) to become available.
    Deferred,
    Active,
    Placeholder,
    Destroyed,
}

/// What a [`ChartLifecycle::present`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentOutcome {
    Created,
    Updated,
    Unchanged,
    Placeholder,
    Deferred,
}

struct ActiveChart<R: Renderer> {
    surface: SharedSurface<R>,
    subscription: ResizeSubscription,
}

enum LifecycleState<R: Renderer> {
    Uninitialized,
    Deferred(CandleSeries),
    Placeholder,
    Active(ActiveChart<R>),
    Destroyed,
}

/// Owns at most one rendering surface for a mounted chart view and keeps it
/// in sync with the latest candle series and the container width.
///
/// Dropping the lifecycle unmounts it.
pub struct ChartLifecycle<C: ChartContainer, F: SurfaceFactory> {
    container: C,
    factory: F,
    options: ChartOptions,
    state: LifecycleState<F::Renderer>,
    surfaces_created: usize,
}

impl<C: ChartContainer, F: SurfaceFactory> ChartLifecycle<C, F> {
    #[must_use]
    pub fn new(container: C, options: ChartOptions, factory: F) -> Self {
        Self {
            container,
            factory,
            options,
            state: LifecycleState::Uninitialized,
            surfaces_created: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> ChartPhase {
        match self.state {
            LifecycleState::Uninitialized => ChartPhase::Uninitialized,
            LifecycleState::Deferred(_) => ChartPhase::Deferred,
            LifecycleState::Placeholder => ChartPhase::Placeholder,
            LifecycleState::Active(_) => ChartPhase::Active,
            LifecycleState::Destroyed => ChartPhase::Destroyed,
        }
    }

    #[must_use]
    pub fn container(&self) -> &C {
        &self.container
    }

    #[must_use]
    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Number of surfaces created over the lifetime of this view.
    #[must_use]
    pub fn surfaces_created(&self) -> usize {
        self.surfaces_created
    }

    #[must_use]
    pub fn placeholder_text(&self) -> Option<&'static str> {
        matches!(self.state, LifecycleState::Placeholder).then_some(NO_DATA_PLACEHOLDER)
    }

    /// Weak handle for host draw callbacks; dead once the surface is released.
    #[must_use]
    pub fn surface_handle(&self) -> Option<Weak<RefCell<ChartSurface<F::Renderer>>>> {
        match &self.state {
            LifecycleState::Active(active) => Some(Rc::downgrade(&active.surface)),
            _ => None,
        }
    }

    /// Runs `inspect` against the active surface, if any.
    pub fn with_surface<T>(&self, inspect: impl FnOnce(&ChartSurface<F::Renderer>) -> T) -> Option<T> {
        match &self.state {
            LifecycleState::Active(active) => Some(inspect(&active.surface.borrow())),
            _ => None,
        }
    }

    /// Shows `candles`: creates the surface on first non-empty data, replaces
    /// data on an existing one, or falls back to the placeholder.
    ///
    /// Never fails; an unavailable container or backend defers the work.
    pub fn present(&mut self, candles: &CandleSeries) -> PresentOutcome {
        if candles.is_empty() {
            self.release_surface("empty candle series");
            self.state = LifecycleState::Placeholder;
            debug!("chart shows no-data placeholder");
            return PresentOutcome::Placeholder;
        }

        if let LifecycleState::Active(active) = &self.state {
            let mut surface = active.surface.borrow_mut();
            if surface.candles() == candles {
                return PresentOutcome::Unchanged;
            }
            surface.set_data(candles);
            if let Err(err) = surface.fit_content() {
                warn!(error = %err, "failed to fit chart content");
            }
            render_logged(&mut surface);
            return PresentOutcome::Updated;
        }

        self.activate(candles)
    }

    /// Retries deferred data once the container has been attached.
    ///
    /// Returns `None` when nothing was deferred.
    pub fn container_ready(&mut self) -> Option<PresentOutcome> {
        let LifecycleState::Deferred(candles) =
            mem::replace(&mut self.state, LifecycleState::Uninitialized)
        else {
            return None;
        };
        Some(self.activate(&candles))
    }

    /// Releases the resize subscription and the surface.
    pub fn unmount(&mut self) {
        self.release_surface("unmount");
        self.state = LifecycleState::Destroyed;
    }

    fn activate(&mut self, candles: &CandleSeries) -> PresentOutcome {
        let Some(width) = self.container.client_width().filter(|width| *width > 0) else {
            debug!(
                candle_count = candles.len(),
                "chart container not attached; deferring"
            );
            self.state = LifecycleState::Deferred(candles.clone());
            return PresentOutcome::Deferred;
        };

        let viewport = Viewport::new(width, self.options.height);
        let surface = self
            .factory
            .create_renderer(viewport)
            .and_then(|renderer| ChartSurface::new(renderer, self.options, width));
        let mut surface = match surface {
            Ok(surface) => surface,
            Err(err) => {
                warn!(error = %err, width, "chart surface creation failed; deferring");
                self.state = LifecycleState::Deferred(candles.clone());
                return PresentOutcome::Deferred;
            }
        };

        surface.set_data(candles);
        if let Err(err) = surface.fit_content() {
            warn!(error = %err, "failed to fit chart content");
        }
        render_logged(&mut surface);

        let surface = Rc::new(RefCell::new(surface));
        let weak_surface = Rc::downgrade(&surface);
        let subscription = self.container.subscribe_resize(Box::new(move |width| {
            let Some(surface) = weak_surface.upgrade() else {
                return;
            };
            let mut surface = surface.borrow_mut();
            match surface.apply_width(width) {
                Ok(true) => render_logged(&mut surface),
                Ok(false) => {}
                Err(err) => warn!(error = %err, width, "failed to apply container width"),
            }
        }));

        self.surfaces_created += 1;
        debug!(
            width,
            height = self.options.height,
            candle_count = candles.len(),
            "chart surface created"
        );
        self.state = LifecycleState::Active(ActiveChart {
            surface,
            subscription,
        });
        PresentOutcome::Created
    }

    fn release_surface(&mut self, reason: &'static str) {
        let previous = mem::replace(&mut self.state, LifecycleState::Uninitialized);
        if let LifecycleState::Active(ActiveChart {
            surface,
            subscription,
        }) = previous
        {
            subscription.unsubscribe();
            drop(surface);
            debug!(reason, "chart surface released");
        }
    }
}

impl<C: ChartContainer, F: SurfaceFactory> Drop for ChartLifecycle<C, F> {
    fn drop(&mut self) {
        if matches!(self.state, LifecycleState::Active(_)) {
            self.unmount();
        }
    }
}

fn render_logged<R: Renderer>(surface: &mut ChartSurface<R>) {
    if let Err(err) = surface.render() {
        warn!(error = %err, "chart render failed");
    }
}
