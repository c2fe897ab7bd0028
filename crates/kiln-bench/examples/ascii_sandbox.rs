//! Run the reference scene and print it as ASCII every few steps.
//!
//! ```sh
//! cargo run -p kiln-bench --example ascii_sandbox -- 240
//! ```

use kiln_core::{Category, MaterialKind};
use kiln_engine::Engine;

fn glyph(engine: &Engine, x: i32, y: i32) -> char {
    let Some(cell) = engine.sample(x, y) else {
        return ' ';
    };
    let Some(def) = engine.registry().get(cell.mat) else {
        return ' ';
    };
    match (def.kind, def.category) {
        (MaterialKind::Water, _) => '~',
        (MaterialKind::Lava, _) => '%',
        (MaterialKind::Fire, _) => '^',
        (MaterialKind::Steam | MaterialKind::Smoke, _) => '.',
        (_, Category::Solid) => '#',
        (_, Category::Powder) => ':',
        (_, Category::Liquid) => '=',
        (_, Category::Gas) => '\'',
        (_, Category::Energy) => '*',
        (_, Category::Object) => 'o',
    }
}

fn render(engine: &Engine) -> String {
    let mut out = String::new();
    // Two rows per line keeps the aspect ratio close to square.
    for y in (0..engine.height() as i32).step_by(2) {
        for x in 0..engine.width() as i32 {
            out.push(glyph(engine, x, y));
        }
        out.push('\n');
    }
    out
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let steps: usize = match std::env::args().nth(1) {
        Some(s) => s.parse()?,
        None => 240,
    };
    let mut engine = kiln_bench::reference_scene(42)?;
    for frame in 0..=steps / 60 {
        println!("tick {}  hash {:016x}", engine.tick().0, engine.material_hash());
        print!("{}", render(&engine));
        if frame * 60 < steps {
            engine.run(60.min(steps - frame * 60))?;
        }
    }
    let m = engine.last_metrics();
    for (name, us) in &m.pass_us {
        println!("{name:>10} {us:>6}us");
    }
    Ok(())
}
