//! Rotating triangle without vertex arrays

use triangle_app::NoVaoTriangle;

fn main() {
    let mut app = NoVaoTriangle::new();
    std::process::exit(triangle_app::launch("triangle_no_vao", &mut app));
}
