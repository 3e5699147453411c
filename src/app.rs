use winit::event::WindowEvent;
use winit::event_loop::ControlFlow;
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

use crate::Engine;
use crate::RunError;

/// # Application
///
/// Entry-point for building a game on top of an [Engine].
pub trait Application: Sized {
    /// Returns the title to be displayed in the application window.
    fn title(&self) -> &str;

    /// Returns the current state of the application. The application will exit if this returns
    /// [ApplicationState::Finished] after [Application::handle_event] or [Application::update] is
    /// called.
    fn state(&self) -> ApplicationState;

    /// Handles the incoming event.
    fn handle_event(&mut self, event: Event);

    /// Updates the game after the engine advanced a frame.
    fn update(&mut self);

    /// Returns the engine driven by the application.
    fn engine(&mut self) -> &mut Engine;

    /// Renders the cameras of the engine. Does nothing by default beyond running the camera
    /// passes.
    fn render(&mut self) {
        self.engine().render(1.0, |_, _| {});
    }

    /// Runs the application.
    fn run(self) -> Result<(), RunError> {
        run_application(self)
    }
}

/// # Application State
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ApplicationState {
    /// Application is running.
    Running,
    /// Application has finished running.
    Finished,
}

/// # Event
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Event {
    /// Application window requested to close.
    CloseRequested,
    /// Application window was resized.
    Resized {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
    /// Application window became hidden or visible again. The engine clock is stopped while
    /// hidden.
    Hidden(bool),
}

fn run_application(mut app: impl Application) -> Result<(), RunError> {
    let event_loop = EventLoop::new()?;
    let mut window_title = app.title().to_string();
    let window = WindowBuilder::new()
        .with_title(&window_title)
        .build(&event_loop)?;

    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run(|event, event_loop_window_target| {
        match event {
            winit::event::Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    app.handle_event(Event::CloseRequested);
                }
                WindowEvent::Resized(size) => {
                    app.handle_event(Event::Resized {
                        width: size.width,
                        height: size.height,
                    });
                }
                WindowEvent::Occluded(hidden) => {
                    let time = &mut app.engine().time;
                    if hidden {
                        time.stop();
                    } else {
                        time.resume();
                    }
                    app.handle_event(Event::Hidden(hidden));
                }
                _ => {}
            },
            winit::event::Event::AboutToWait => {
                if app.engine().update() {
                    app.update();
                    app.render();
                }

                let title = app.title();
                if title != window_title {
                    window_title = title.to_string();
                    window.set_title(&window_title);
                }
            }
            _ => {}
        }

        if app.state() == ApplicationState::Finished {
            log::debug!("application finished");
            event_loop_window_target.exit();
        }
    })?;

    Ok(())
}
