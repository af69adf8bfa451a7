//! Shadow endpoint
//!
//! The light scene can POST its geometry to an HTTP endpoint that answers
//! with shadow extents. The answer is logged, never drawn. The same answer
//! can be computed locally with [`ShadowResponse::evaluate`].

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::consts::*;
use crate::settings::ShadowAnchor;
use crate::sim::{LightScene, LightSource, Stick, extended_extent, point_shadow};

/// One light in a shadow request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LightParams {
    pub x: f32,
    pub y: f32,
    pub color: Rgb,
    pub intensity: f32,
    pub is_extended: bool,
    pub radius: f32,
}

impl Default for LightParams {
    fn default() -> Self {
        Self::from(&LightSource::default())
    }
}

impl From<&LightSource> for LightParams {
    fn from(light: &LightSource) -> Self {
        Self {
            x: light.pos.x,
            y: light.pos.y,
            color: light.color,
            intensity: light.intensity,
            is_extended: light.extended,
            radius: light.radius,
        }
    }
}

impl LightParams {
    fn to_light(&self) -> LightSource {
        LightSource {
            pos: glam::Vec2::new(self.x, self.y),
            color: self.color,
            intensity: self.intensity,
            extended: self.is_extended,
            radius: self.radius,
        }
    }
}

/// Request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShadowRequest {
    pub lights: Vec<LightParams>,
    pub stick_x: f32,
    pub stick_height: f32,
    pub ground_y: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
}

impl Default for ShadowRequest {
    fn default() -> Self {
        Self {
            lights: Vec::new(),
            stick_x: STICK_X,
            stick_height: STICK_HEIGHT,
            ground_y: GROUND_Y,
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
        }
    }
}

impl ShadowRequest {
    pub fn from_scene(scene: &LightScene) -> Self {
        Self {
            lights: scene.lights.iter().map(LightParams::from).collect(),
            stick_x: scene.stick.x,
            stick_height: scene.stick.height,
            ground_y: scene.ground_y,
            canvas_width: scene.canvas.width,
            canvas_height: scene.canvas.height,
        }
    }

    fn stick(&self) -> Stick {
        Stick {
            x: self.stick_x,
            height: self.stick_height,
            ..Stick::default()
        }
    }
}

/// Shadow geometry of one light
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShadowGeometry {
    Point {
        shadow_start: f32,
        shadow_end: f32,
        shadow_length: f32,
        visible: bool,
    },
    Extended {
        umbra_start: f32,
        umbra_end: f32,
        penumbra_left: f32,
        penumbra_right: f32,
        visible: bool,
        #[serde(default)]
        has_umbra: bool,
    },
}

impl ShadowGeometry {
    pub fn visible(&self) -> bool {
        match self {
            ShadowGeometry::Point { visible, .. } | ShadowGeometry::Extended { visible, .. } => {
                *visible
            }
        }
    }
}

/// One entry of the response, in request light order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowEntry {
    #[serde(flatten)]
    pub geometry: ShadowGeometry,
    pub light_index: usize,
    pub intensity: f32,
}

/// Response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowResponse {
    pub shadows: Vec<ShadowEntry>,
    pub stick_x: f32,
    pub stick_height: f32,
}

impl ShadowResponse {
    /// Answer a request locally (ground-anchored, like the endpoint)
    pub fn evaluate(request: &ShadowRequest) -> Self {
        let stick = request.stick();
        let ground_y = request.ground_y;
        let anchor = ShadowAnchor::Ground;

        let shadows = request
            .lights
            .iter()
            .enumerate()
            .map(|(light_index, params)| {
                let light = params.to_light();
                let geometry = if light.extended {
                    match extended_extent(&light, &stick, ground_y, anchor) {
                        Some(e) => ShadowGeometry::Extended {
                            umbra_start: e.umbra_start,
                            umbra_end: e.umbra_end,
                            penumbra_left: e.penumbra_left,
                            penumbra_right: e.penumbra_right,
                            visible: true,
                            has_umbra: e.has_umbra,
                        },
                        None => ShadowGeometry::Extended {
                            umbra_start: stick.x,
                            umbra_end: stick.x,
                            penumbra_left: stick.x,
                            penumbra_right: stick.x,
                            visible: false,
                            has_umbra: false,
                        },
                    }
                } else {
                    match point_shadow(light.pos, &stick, ground_y, anchor) {
                        Some(s) => ShadowGeometry::Point {
                            shadow_start: s.start,
                            shadow_end: s.end,
                            shadow_length: s.length,
                            visible: true,
                        },
                        None => ShadowGeometry::Point {
                            shadow_start: stick.x,
                            shadow_end: stick.x,
                            shadow_length: 0.0,
                            visible: false,
                        },
                    }
                };
                ShadowEntry {
                    geometry,
                    light_index,
                    intensity: params.intensity,
                }
            })
            .collect();

        Self {
            shadows,
            stick_x: request.stick_x,
            stick_height: request.stick_height,
        }
    }
}

/// POST the request and log the answer. Failures are logged and dropped.
#[cfg(target_arch = "wasm32")]
pub fn post(endpoint: String, request: ShadowRequest) {
    wasm_bindgen_futures::spawn_local(async move {
        match fetch(&endpoint, &request).await {
            Ok(response) => log::debug!(
                "Shadow endpoint: {} shadow(s), {} visible",
                response.shadows.len(),
                response.shadows.iter().filter(|s| s.geometry.visible()).count()
            ),
            Err(e) => log::warn!("{}", e),
        }
    });
}

#[cfg(target_arch = "wasm32")]
async fn fetch(endpoint: &str, request: &ShadowRequest) -> crate::error::Result<ShadowResponse> {
    use crate::error::SimError;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    let js_err = |e: JsValue| SimError::ShadowApi(format!("{:?}", e));

    let body =
        serde_json::to_string(request).map_err(|e| SimError::ShadowApi(e.to_string()))?;
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_mode(RequestMode::SameOrigin);
    init.set_body(&JsValue::from_str(&body));

    let req = Request::new_with_str_and_init(endpoint, &init).map_err(js_err)?;
    req.headers()
        .set("Content-Type", "application/json")
        .map_err(js_err)?;

    let window = web_sys::window().ok_or_else(|| SimError::ShadowApi("no window".into()))?;
    let resp: Response = JsFuture::from(window.fetch_with_request(&req))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    if !resp.ok() {
        return Err(SimError::ShadowApi(format!("HTTP {}", resp.status())));
    }

    let text = JsFuture::from(resp.text().map_err(js_err)?)
        .await
        .map_err(js_err)?
        .as_string()
        .unwrap_or_default();
    serde_json::from_str(&text).map_err(|e| SimError::ShadowApi(format!("bad response: {e}")))
}
