use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

#[derive(serde::Deserialize, Debug)]
pub struct SceneResponse {
    scene: String,
}

impl SerdeJSONBodyHTTPResponseType for SceneResponse {}

impl SceneResponse {
    pub fn scene(&self) -> &str { self.scene.as_str() }
}
