//! The narrow slice of OpenGL this crate issues calls through.
//!
//! [`GlDevice`] mirrors the names and argument order of
//! [`glow::HasContext`] so the implementation for [`glow::Context`] is pure
//! forwarding. Keeping the surface small lets the cache and dispatcher run
//! against a recording device in tests.

use std::fmt;
use std::hash::Hash;

use glow::{HasContext, PixelUnpackData};

/// GL entry points used by the resource cache, the offscreen buffers and the
/// capability probe.
///
/// Every call targets whichever native context is current on the calling
/// thread. Nothing here binds or unbinds a context.
///
/// # Safety
///
/// The `unsafe` methods carry the contract of the GL call they wrap: a
/// context must be current and every handle passed in must belong to it.
#[allow(missing_docs, clippy::missing_safety_doc)]
pub trait GlDevice {
    type Shader: Copy + Eq + Hash + fmt::Debug;
    type Program: Copy + Eq + Hash + fmt::Debug;
    type Framebuffer: Copy + Eq + fmt::Debug;
    type Texture: Copy + Eq + fmt::Debug;
    type Renderbuffer: Copy + Eq + fmt::Debug;

    /// Whether the context advertises `name` (e.g. `GL_ARB_occlusion_query`).
    fn supports_extension(&self, name: &str) -> bool;

    unsafe fn get_error(&self) -> u32;

    unsafe fn create_shader(&self, shader_type: u32) -> Result<Self::Shader, String>;
    unsafe fn shader_source(&self, shader: Self::Shader, source: &str);
    unsafe fn compile_shader(&self, shader: Self::Shader);
    unsafe fn get_shader_compile_status(&self, shader: Self::Shader) -> bool;
    unsafe fn get_shader_info_log(&self, shader: Self::Shader) -> String;
    unsafe fn delete_shader(&self, shader: Self::Shader);

    unsafe fn create_program(&self) -> Result<Self::Program, String>;
    unsafe fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    unsafe fn link_program(&self, program: Self::Program);
    unsafe fn get_program_link_status(&self, program: Self::Program) -> bool;
    unsafe fn get_program_info_log(&self, program: Self::Program) -> String;
    unsafe fn delete_program(&self, program: Self::Program);

    unsafe fn create_framebuffer(&self) -> Result<Self::Framebuffer, String>;
    unsafe fn bind_framebuffer(&self, target: u32, framebuffer: Option<Self::Framebuffer>);
    unsafe fn framebuffer_texture_2d(
        &self,
        target: u32,
        attachment: u32,
        texture_target: u32,
        texture: Option<Self::Texture>,
        level: i32,
    );
    unsafe fn framebuffer_renderbuffer(
        &self,
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: Option<Self::Renderbuffer>,
    );
    unsafe fn check_framebuffer_status(&self, target: u32) -> u32;
    unsafe fn delete_framebuffer(&self, framebuffer: Self::Framebuffer);

    unsafe fn create_texture(&self) -> Result<Self::Texture, String>;
    unsafe fn bind_texture(&self, target: u32, texture: Option<Self::Texture>);
    unsafe fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32);
    /// Allocate level 0 of the bound texture without uploading any pixels.
    unsafe fn tex_image_2d_empty(
        &self,
        target: u32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
    );
    unsafe fn delete_texture(&self, texture: Self::Texture);

    unsafe fn create_renderbuffer(&self) -> Result<Self::Renderbuffer, String>;
    unsafe fn bind_renderbuffer(&self, target: u32, renderbuffer: Option<Self::Renderbuffer>);
    unsafe fn renderbuffer_storage(
        &self,
        target: u32,
        internal_format: u32,
        width: i32,
        height: i32,
    );
    unsafe fn delete_renderbuffer(&self, renderbuffer: Self::Renderbuffer);
}

impl GlDevice for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Framebuffer = glow::Framebuffer;
    type Texture = glow::Texture;
    type Renderbuffer = glow::Renderbuffer;

    fn supports_extension(&self, name: &str) -> bool {
        self.supported_extensions().contains(name)
    }

    unsafe fn get_error(&self) -> u32 {
        unsafe { HasContext::get_error(self) }
    }

    unsafe fn create_shader(&self, shader_type: u32) -> Result<Self::Shader, String> {
        unsafe { HasContext::create_shader(self, shader_type) }
    }

    unsafe fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) }
    }

    unsafe fn compile_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::compile_shader(self, shader) }
    }

    unsafe fn get_shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { HasContext::get_shader_compile_status(self, shader) }
    }

    unsafe fn get_shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { HasContext::get_shader_info_log(self, shader) }
    }

    unsafe fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    unsafe fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    unsafe fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    unsafe fn link_program(&self, program: Self::Program) {
        unsafe { HasContext::link_program(self, program) }
    }

    unsafe fn get_program_link_status(&self, program: Self::Program) -> bool {
        unsafe { HasContext::get_program_link_status(self, program) }
    }

    unsafe fn get_program_info_log(&self, program: Self::Program) -> String {
        unsafe { HasContext::get_program_info_log(self, program) }
    }

    unsafe fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    unsafe fn create_framebuffer(&self) -> Result<Self::Framebuffer, String> {
        unsafe { HasContext::create_framebuffer(self) }
    }

    unsafe fn bind_framebuffer(&self, target: u32, framebuffer: Option<Self::Framebuffer>) {
        unsafe { HasContext::bind_framebuffer(self, target, framebuffer) }
    }

    unsafe fn framebuffer_texture_2d(
        &self,
        target: u32,
        attachment: u32,
        texture_target: u32,
        texture: Option<Self::Texture>,
        level: i32,
    ) {
        unsafe {
            HasContext::framebuffer_texture_2d(
                self,
                target,
                attachment,
                texture_target,
                texture,
                level,
            );
        }
    }

    unsafe fn framebuffer_renderbuffer(
        &self,
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: Option<Self::Renderbuffer>,
    ) {
        unsafe {
            HasContext::framebuffer_renderbuffer(
                self,
                target,
                attachment,
                renderbuffer_target,
                renderbuffer,
            );
        }
    }

    unsafe fn check_framebuffer_status(&self, target: u32) -> u32 {
        unsafe { HasContext::check_framebuffer_status(self, target) }
    }

    unsafe fn delete_framebuffer(&self, framebuffer: Self::Framebuffer) {
        unsafe { HasContext::delete_framebuffer(self, framebuffer) }
    }

    unsafe fn create_texture(&self) -> Result<Self::Texture, String> {
        unsafe { HasContext::create_texture(self) }
    }

    unsafe fn bind_texture(&self, target: u32, texture: Option<Self::Texture>) {
        unsafe { HasContext::bind_texture(self, target, texture) }
    }

    unsafe fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        unsafe { HasContext::tex_parameter_i32(self, target, parameter, value) }
    }

    unsafe fn tex_image_2d_empty(
        &self,
        target: u32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
    ) {
        unsafe {
            HasContext::tex_image_2d(
                self,
                target,
                0,
                internal_format,
                width,
                height,
                0,
                format,
                ty,
                PixelUnpackData::Slice(None),
            );
        }
    }

    unsafe fn delete_texture(&self, texture: Self::Texture) {
        unsafe { HasContext::delete_texture(self, texture) }
    }

    unsafe fn create_renderbuffer(&self) -> Result<Self::Renderbuffer, String> {
        unsafe { HasContext::create_renderbuffer(self) }
    }

    unsafe fn bind_renderbuffer(&self, target: u32, renderbuffer: Option<Self::Renderbuffer>) {
        unsafe { HasContext::bind_renderbuffer(self, target, renderbuffer) }
    }

    unsafe fn renderbuffer_storage(
        &self,
        target: u32,
        internal_format: u32,
        width: i32,
        height: i32,
    ) {
        unsafe { HasContext::renderbuffer_storage(self, target, internal_format, width, height) }
    }

    unsafe fn delete_renderbuffer(&self, renderbuffer: Self::Renderbuffer) {
        unsafe { HasContext::delete_renderbuffer(self, renderbuffer) }
    }
}
