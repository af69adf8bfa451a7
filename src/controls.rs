//! UI controls
//!
//! Page controls are addressed by dotted keys (`light.0.x`, `sim.gravity`,
//! `pendulum.add`, ...). A key plus the control's string value parses into a
//! [`Command`]; applying it goes through the scene's clamped update path.
//! Readouts flow the other way as `(key, text)` pairs.

use crate::color::Rgb;
use crate::error::{Result, SimError};
use crate::sim::{
    LightUpdate, PendulumSceneUpdate, PendulumUpdate, Pointer, Scene, StickUpdate,
    small_angle_period,
};

/// A parsed control change
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Light(usize, LightUpdate),
    AddLight,
    RemoveLight(usize),
    Stick(StickUpdate),
    Pendulum(usize, PendulumUpdate),
    AddPendulum,
    RemovePendulum(usize),
    Global(PendulumSceneUpdate),
    ToggleRun,
    Reset,
}

fn invalid(key: &str, value: &str) -> SimError {
    SimError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn number(key: &str, value: &str) -> Result<f32> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(key, value))
}

fn flag(key: &str, value: &str) -> Result<bool> {
    match value.trim() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" | "" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn color(value: &str) -> Result<Rgb> {
    value.parse()
}

fn index(key: &str, part: &str) -> Result<usize> {
    part.parse().map_err(|_| SimError::UnknownControl(key.to_string()))
}

impl Command {
    /// Parse a control key and its value (ignored for buttons)
    pub fn parse(key: &str, value: &str) -> Result<Self> {
        let parts: Vec<&str> = key.split('.').collect();
        let unknown = || SimError::UnknownControl(key.to_string());

        let command = match parts.as_slice() {
            ["light", "add"] => Command::AddLight,
            ["light", n, "remove"] => Command::RemoveLight(index(key, n)?),
            ["light", n, field] => {
                let update = match *field {
                    "x" => LightUpdate::X(number(key, value)?),
                    "y" => LightUpdate::Y(number(key, value)?),
                    "color" => LightUpdate::Color(color(value)?),
                    "intensity" => LightUpdate::Intensity(number(key, value)?),
                    "extended" => LightUpdate::Extended(flag(key, value)?),
                    "radius" => LightUpdate::Radius(number(key, value)?),
                    _ => return Err(unknown()),
                };
                Command::Light(index(key, n)?, update)
            }
            ["stick", "x"] => Command::Stick(StickUpdate::X(number(key, value)?)),
            ["stick", "height"] => Command::Stick(StickUpdate::Height(number(key, value)?)),
            ["pendulum", "add"] => Command::AddPendulum,
            ["pendulum", n, "remove"] => Command::RemovePendulum(index(key, n)?),
            ["pendulum", n, field] => {
                let update = match *field {
                    "length" => PendulumUpdate::Length(number(key, value)?),
                    "mass" => PendulumUpdate::Mass(number(key, value)?),
                    "color" => PendulumUpdate::Color(color(value)?),
                    "damping" => PendulumUpdate::Damping(number(key, value)?),
                    _ => return Err(unknown()),
                };
                Command::Pendulum(index(key, n)?, update)
            }
            ["sim", "toggle"] => Command::ToggleRun,
            ["sim", "reset"] => Command::Reset,
            ["sim", field] => Command::Global(match *field {
                "gravity" => PendulumSceneUpdate::Gravity(number(key, value)?),
                "time_scale" => PendulumSceneUpdate::TimeScale(number(key, value)?),
                "trail_length" => {
                    let n = number(key, value)?;
                    if n < 0.0 {
                        return Err(invalid(key, value));
                    }
                    PendulumSceneUpdate::TrailLength(n.round() as usize)
                }
                "show_trail" => PendulumSceneUpdate::ShowTrail(flag(key, value)?),
                "show_forces" => PendulumSceneUpdate::ShowForces(flag(key, value)?),
                "running" => PendulumSceneUpdate::Running(flag(key, value)?),
                _ => return Err(unknown()),
            }),
            _ => return Err(unknown()),
        };
        Ok(command)
    }

    /// Whether the command renumbers or resets entities, invalidating a held drag
    pub fn releases_drag(&self) -> bool {
        matches!(
            self,
            Command::RemoveLight(_) | Command::RemovePendulum(_) | Command::Reset
        )
    }

    /// Apply on behalf of the page, ending a drag the command would invalidate
    pub fn run(self, scene: &mut Scene, pointer: &mut Pointer) -> Result<()> {
        if self.releases_drag() && pointer.is_dragging() {
            scene.cancel_drag(pointer);
        }
        self.apply(scene)
    }

    /// Apply to the active scene. Light commands need the light scene,
    /// pendulum and `sim.*` commands the pendulum scene.
    pub fn apply(self, scene: &mut Scene) -> Result<()> {
        match (self, scene) {
            (Command::Light(i, update), Scene::Light(s)) => s.apply(i, update),
            (Command::AddLight, Scene::Light(s)) => s.add_light().map(|_| ()),
            (Command::RemoveLight(i), Scene::Light(s)) => s.remove_light(i),
            (Command::Stick(update), Scene::Light(s)) => {
                s.apply_stick(update);
                Ok(())
            }
            (Command::Pendulum(i, update), Scene::Pendulum(s)) => s.apply(i, update),
            (Command::AddPendulum, Scene::Pendulum(s)) => s.add_pendulum().map(|_| ()),
            (Command::RemovePendulum(i), Scene::Pendulum(s)) => s.remove_pendulum(i),
            (Command::Global(update), Scene::Pendulum(s)) => {
                s.apply_global(update);
                Ok(())
            }
            (Command::ToggleRun, Scene::Pendulum(s)) => {
                s.running = !s.running;
                Ok(())
            }
            (Command::Reset, Scene::Pendulum(s)) => {
                s.reset_all();
                Ok(())
            }
            (command, scene) => Err(SimError::WrongScene(format!(
                "{:?} on {}",
                command,
                scene.kind().as_str()
            ))),
        }
    }
}

/// Entity panel keys (`light.N` / `pendulum.N`) that currently exist
pub fn entities(scene: &Scene) -> Vec<String> {
    match scene {
        Scene::Light(s) => (0..s.lights.len()).map(|i| format!("light.{i}")).collect(),
        Scene::Pendulum(s) => (0..s.pendulums.len())
            .map(|i| format!("pendulum.{i}"))
            .collect(),
    }
}

/// Text readouts for the page, keyed like the controls
pub fn readouts(scene: &Scene) -> Vec<(String, String)> {
    let mut out = Vec::new();
    match scene {
        Scene::Light(s) => {
            for (i, light) in s.lights.iter().enumerate() {
                out.push((format!("light.{i}.x"), format!("{:.0}", light.pos.x)));
                out.push((format!("light.{i}.y"), format!("{:.0}", light.pos.y)));
                out.push((format!("light.{i}.color"), light.color.to_string()));
                out.push((
                    format!("light.{i}.intensity"),
                    format!("{:.2}", light.intensity),
                ));
                out.push((format!("light.{i}.radius"), format!("{:.0}", light.radius)));
            }
            out.push(("light.count".into(), s.lights.len().to_string()));
            out.push(("stick.x".into(), format!("{:.0}", s.stick.x)));
            out.push(("stick.height".into(), format!("{:.0}", s.stick.height)));
        }
        Scene::Pendulum(s) => {
            for (i, p) in s.pendulums.iter().enumerate() {
                out.push((format!("pendulum.{i}.length"), format!("{:.0}", p.length)));
                out.push((format!("pendulum.{i}.mass"), format!("{:.1}", p.mass)));
                out.push((format!("pendulum.{i}.damping"), format!("{:.3}", p.damping)));
                out.push((format!("pendulum.{i}.color"), p.color.to_string()));
                out.push((format!("pendulum.{i}.angle"), format!("{}°", p.angle_degrees())));
                out.push((
                    format!("pendulum.{i}.velocity"),
                    format!("{:.3} rad/s", p.angular_vel),
                ));
                out.push((
                    format!("pendulum.{i}.period"),
                    format!("{:.0}", small_angle_period(p.length, s.params.gravity)),
                ));
            }
            out.push(("pendulum.count".into(), s.pendulums.len().to_string()));
            out.push(("sim.gravity".into(), format!("{:.2}", s.params.gravity)));
            out.push((
                "sim.time_scale".into(),
                format!("{:.1}x", s.params.time_scale),
            ));
            out.push(("sim.trail_length".into(), s.trail_capacity().to_string()));
            out.push((
                "sim.toggle".into(),
                if s.running { "Pause" } else { "Start" }.into(),
            ));
        }
    }
    out
}
