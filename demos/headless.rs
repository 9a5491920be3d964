//! Headless Viewer Example
//!
//! Drives the viewer without a window: loads a two-solid part, frames it,
//! clicks one solid, switches to a preset view and prints every draw call the
//! viewer issues.
//!
//! Run with `RUST_LOG=debug cargo run --example headless` to see the viewer's
//! own log output.

use solidview::picking::{PointerEvent, PointerEventKind};
use solidview::scene::{BackgroundLayer, Camera, Scene};
use solidview::settings::ViewerSettings;
use solidview::viewer::{RenderBackend, SceneLayer, Viewer};

const PART: &str = r#"{
    "name": "bracket",
    "solids": [
        {
            "id": 1,
            "name": "Base",
            "faces": [
                { "name": "top", "mesh": { "vertices": [-20,-10,5, 20,-10,5, 20,10,5, -20,10,5], "faces": [0,1,2, 0,2,3] } },
                { "name": "bottom", "mesh": { "vertices": [-20,-10,0, 20,-10,0, 20,10,0, -20,10,0], "faces": [0,2,1, 0,3,2] } }
            ],
            "edges": [
                { "name": "outline", "mesh": [-20,-10,5, 20,-10,5, 20,10,5, -20,10,5, -20,-10,5] }
            ]
        },
        {
            "id": 2,
            "name": "Post",
            "faces": [
                { "name": "cap", "mesh": { "vertices": [-3,-3,30, 3,-3,30, 3,3,30, -3,3,30], "faces": [0,1,2, 0,2,3] } }
            ],
            "edges": [
                { "name": "axis", "mesh": [0,0,5, 0,0,30] }
            ]
        }
    ]
}"#;

/// Backend that prints instead of drawing.
struct PrintBackend;

impl RenderBackend for PrintBackend {
    fn clear(&mut self) {
        println!("  clear");
    }

    fn draw_background(&mut self, layer: &BackgroundLayer) {
        println!("  background '{}' {}x{}", layer.url, layer.width, layer.height);
    }

    fn draw_scene(&mut self, layer: SceneLayer, scene: &Scene, camera: &Camera) {
        println!(
            "  {layer:?}: {} nodes, camera at {:.2} looking at {:.2}",
            scene.len(),
            camera.position(),
            camera.target()
        );
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut viewer = Viewer::new(ViewerSettings::default(), 800, 600);
    let mut backend = PrintBackend;

    // The host decodes images; pretend the start-up background arrived.
    if let Some(ticket) = viewer.take_background_request() {
        let layer = BackgroundLayer {
            url: ticket.url.clone(),
            width: 2,
            height: 512,
        };
        viewer.on_background_loaded(&ticket, Ok(layer));
    }

    let update = viewer.update_shape_object_json(PART)?;
    println!("Loaded {} solids", update.solids.len());

    viewer.zoom_all();
    println!("Frame {}:", viewer.frame_count());
    viewer.tick(1.0 / 60.0, &mut backend);

    // Click the middle of the surface.
    viewer.handle_pointer(&PointerEvent::new(PointerEventKind::Click, 400.0, 300.0, 0));
    match viewer.selected() {
        Some(node) => println!("Selected '{}'", viewer.scene().get_node(node).map_or("?", |n| n.name.as_str())),
        None => println!("Nothing under the pointer"),
    }

    let post = viewer.solid_by_name("Post")?;
    println!("Post center: {:.2}", viewer.get_object_center(Some(post)));

    viewer.set_preset_view("front");
    println!("Frame {}:", viewer.frame_count());
    viewer.tick(1.0 / 60.0, &mut backend);

    // Nothing changed since the last frame, so nothing is drawn.
    let drawn = viewer.tick(1.0 / 60.0, &mut backend);
    println!("Idle tick drew a frame: {drawn}");

    Ok(())
}
