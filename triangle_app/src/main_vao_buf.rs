//! Rotating triangle drawn from a VAO and vertex buffer

use triangle_app::VaoBufferTriangle;

fn main() {
    let mut app = VaoBufferTriangle::new();
    std::process::exit(triangle_app::launch("triangle_vao_buf", &mut app));
}
