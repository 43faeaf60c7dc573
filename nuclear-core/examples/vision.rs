//! A vision reactor reacting to camera frames with the latest motor state.
//!
//! Run with `RUST_LOG=debug` to see binding and dispatch.

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use nuclear_core::reactive::{Reactor, ReactorController};
use nuclear_core::{ReactorConfig, Result};

struct CameraData {
    data: String,
}

struct MotorData {
    data: String,
}

fn react(camera: &CameraData, motor: &MotorData) {
    info!("Reacting on camera data, got: [{}], [{}]", camera.data, motor.data);
}

struct Vision {
    reactor: Arc<Reactor>,
}

impl Vision {
    fn new(controller: &ReactorController) -> Result<Arc<Self>> {
        let vision = Arc::new(Self {
            reactor: controller.add_reactor(ReactorConfig::with_name("vision")),
        });

        vision.reactor.on::<(CameraData,), (MotorData,), _>(react)?;

        vision
            .reactor
            .on_trigger::<(CameraData, MotorData), _>(|_: &CameraData, _: &MotorData| {
                info!("Double trigger!");
            })?;

        let weak = Arc::downgrade(&vision);
        vision
            .reactor
            .on::<(CameraData,), (MotorData,), _>(move |camera: &CameraData, motor: &MotorData| {
                if let Some(vision) = weak.upgrade() {
                    vision.react_inner(camera, motor);
                }
            })?;

        Ok(vision)
    }

    fn react_inner(&self, camera: &CameraData, motor: &MotorData) {
        info!(
            reactor = self.reactor.name(),
            "ReactInner on camera data, got: [{}], [{}]", camera.data, motor.data
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let controller = ReactorController::new();
    controller.store().publish(CameraData {
        data: "Class::CameraData".to_string(),
    });
    controller.store().publish(MotorData {
        data: "Class::MotorData".to_string(),
    });

    let vision = Vision::new(&controller)?;
    info!(subscriptions = vision.reactor.subscription_count(), "vision wired");

    for report in controller.notify::<CameraData>() {
        for (id, error) in report.failures() {
            warn!(subscription = %id, %error, "camera reaction failed");
        }
    }
    for report in controller.notify::<MotorData>() {
        for (id, error) in report.failures() {
            warn!(subscription = %id, %error, "motor reaction failed");
        }
    }

    Ok(())
}
