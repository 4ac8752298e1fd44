pub mod error;
pub mod hud;
pub mod item;
pub mod lighting;
pub mod scene;
pub mod text;

pub use error::SceneError;
pub use hud::Hud;
pub use item::GameItem;
pub use lighting::SceneLight;
pub use scene::{MeshGroup, Scene};
pub use text::{FontAtlas, FontSheet, GlyphInfo, TextItem, build_text_mesh};
