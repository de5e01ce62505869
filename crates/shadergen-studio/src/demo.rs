//! Built-in shader pair used when no files are given.
//!
//! Written in GLSL ES 1.00 so it runs on both context tiers.

pub const VERTEX: &str = r#"attribute vec2 position;

void main() {
    gl_Position = vec4(position, 0.0, 1.0);
}
"#;

pub const FRAGMENT: &str = r#"#ifdef GL_ES
precision mediump float;
#endif

uniform float u_time;
uniform vec2 u_resolution;

void main() {
    vec2 uv = gl_FragCoord.xy / u_resolution;
    vec3 color = 0.5 + 0.5 * cos(u_time + uv.xyx + vec3(0.0, 2.0, 4.0));
    gl_FragColor = vec4(color, 1.0);
}
"#;
