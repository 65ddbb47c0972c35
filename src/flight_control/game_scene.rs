/// Scene the game is currently in. Vessel state is only available in `Flight`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum GameScene {
    Flight,
    SpaceCenter,
    TrackingStation,
    Editor,
    Unknown,
}

impl From<&str> for GameScene {
    fn from(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "flight" => GameScene::Flight,
            "space_center" | "spacecenter" => GameScene::SpaceCenter,
            "tracking_station" | "trackingstation" => GameScene::TrackingStation,
            "editor" | "editor_vab" | "editor_sph" => GameScene::Editor,
            _ => GameScene::Unknown,
        }
    }
}

impl From<GameScene> for &'static str {
    fn from(value: GameScene) -> Self {
        match value {
            GameScene::Flight => "flight",
            GameScene::SpaceCenter => "space_center",
            GameScene::TrackingStation => "tracking_station",
            GameScene::Editor => "editor",
            GameScene::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for GameScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(<&'static str>::from(*self))
    }
}
