use glam::Vec2;
use sprig::systems;
use sprig::Application;
use sprig::ApplicationState;
use sprig::AutomatismOptions;
use sprig::Camera;
use sprig::ChainedTween;
use sprig::Config;
use sprig::Easing;
use sprig::EffectOptions;
use sprig::Engine;
use sprig::Event;
use sprig::EventKind;
use sprig::FocusOptions;
use sprig::GameObject;
use sprig::SceneError;
use sprig::Tween;

struct Playground {
    state: ApplicationState,
    engine: Engine,
    frames: u64,
}

impl Playground {
    fn new() -> Result<Self, SceneError> {
        let mut engine = Engine::new(Config {
            default_sortable_children: true,
            debug: false,
        });
        let scene = &mut engine.scene;

        let world = scene.spawn(GameObject::new().with_name("world").with_alpha(0.0));
        let far = scene.spawn(
            GameObject::new()
                .with_name("far hills")
                .with_z_scale(0.5)
                .with_z_index(-1.0),
        );
        let player = scene.spawn(
            GameObject::new()
                .with_name("player")
                .with_position(Vec2::new(0.0, 120.0)),
        );
        let blade = scene.spawn(
            GameObject::new()
                .with_name("blade")
                .with_position(Vec2::new(24.0, 0.0))
                .with_scale(Vec2::splat(0.5)),
        );
        scene.add_all(world, &[player, far])?;
        scene.add(player, blade)?;

        scene.add_automatism(
            blade,
            "spin",
            Some("rotate"),
            AutomatismOptions::default().interval(50.0).value1(0.1),
        )?;
        scene.add_automatism(
            player,
            "walk",
            Some("translate_x"),
            AutomatismOptions::default().interval(100.0).value1(4.0),
        )?;
        scene.set_interval(player, 2000.0, |scene, node| {
            if let Err(error) = scene.shake(node, Vec2::splat(3.0), 250.0, EffectOptions::new()) {
                log::warn!("{error}");
            }
        })?;
        scene.fade_in(world, 1000.0, EffectOptions::new())?;
        scene.listen(player, EventKind::ShakeEnd, |_, node| {
            log::info!("{node:?} stopped shaking");
        })?;

        engine.tweens.add_chain(
            ChainedTween::new()
                .then(Tween::new(far, "y", -40.0, 1500.0)?.easing(Easing::SineInOut))
                .then(Tween::wait(500.0))
                .then(Tween::new(far, "y", 0.0, 1500.0)?.easing(Easing::BounceOut))
                .on_complete(|_| log::info!("hills settled")),
        );

        let mut camera = Camera::new("main", Vec2::new(800.0, 600.0));
        camera.set_scene(Some(world));
        camera.focus(player, FocusOptions::default().axes(true, false, false));
        camera.set_alpha(0.0);
        camera.fade_in(500.0);
        engine.cameras.push(camera);

        Ok(Self {
            state: ApplicationState::Running,
            engine,
            frames: 0,
        })
    }
}

impl Application for Playground {
    fn title(&self) -> &str {
        "Sprig Playground"
    }

    fn state(&self) -> ApplicationState {
        self.state
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::CloseRequested => {
                self.state = ApplicationState::Finished;
            }
            Event::Resized { width, height } => {
                for camera in &mut self.engine.cameras {
                    camera.set_viewport(Vec2::new(width as f32, height as f32));
                }
            }
            Event::Hidden(hidden) => log::debug!("window hidden: {hidden}"),
        }
    }

    fn update(&mut self) {
        self.frames += 1;
        if self.frames % 60 == 0 {
            log::debug!(
                "frame {} at {:.0} fps, {} tweens",
                self.frames,
                self.engine.time.fps(),
                self.engine.tweens.len()
            );
        }
        for camera in &self.engine.cameras {
            for event in camera.events() {
                log::debug!("camera {}: {event:?}", camera.name());
            }
        }
    }

    fn engine(&mut self) -> &mut Engine {
        &mut self.engine
    }

    fn render(&mut self) {
        self.engine.render(1.0, |camera, scene| {
            let Some(root) = camera.scene() else {
                return;
            };
            let view = camera.view_transform();
            for drawable in systems::collect_drawables(scene, root) {
                let screen = view.transform_point2(drawable.transform.position());
                log::trace!(
                    "{} draws {:?} at {screen} alpha {:.2}",
                    camera.name(),
                    drawable.node,
                    drawable.alpha * camera.alpha()
                );
            }
        });
    }
}

fn main() {
    env_logger::init();

    let playground = match Playground::new() {
        Ok(playground) => playground,
        Err(error) => {
            log::error!("failed to build the playground: {error}");
            return;
        }
    };

    if let Err(error) = playground.run() {
        log::error!("{error}");
    }
}
