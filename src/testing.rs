//! Recording [`GlDevice`] used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};

use crate::device::GlDevice;

/// Route `log` output through the test harness when `RUST_LOG` is set.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Fake GL device that hands out increasing integer handles and records the
/// name of every entry point it receives.
pub struct MockGl {
    extensions: HashSet<String>,
    next_handle: Cell<u32>,
    calls: RefCell<Vec<&'static str>>,
    /// When set, every shader reports a failed compile.
    pub fail_compile: Cell<bool>,
    /// When set, every program reports a failed link.
    pub fail_link: Cell<bool>,
    /// Value returned by `check_framebuffer_status`.
    pub framebuffer_status: Cell<u32>,
    /// Attachment points passed to `framebuffer_renderbuffer`, in order.
    pub renderbuffer_attachments: RefCell<Vec<u32>>,
    /// Framebuffer bound by the last `bind_framebuffer`.
    pub bound_framebuffer: Cell<Option<u32>>,
    /// Name of a `create_*` entry point that reports failure.
    pub fail_create: Cell<Option<&'static str>>,
    /// Errors handed out by `get_error` before anything else.
    pub queued_errors: RefCell<VecDeque<u32>>,
    /// Error reported forever once the queue is empty, as a lost context does.
    pub persistent_error: Cell<Option<u32>>,
}

impl MockGl {
    pub fn new() -> Self {
        Self::with_extensions(&[])
    }

    pub fn with_extensions(extensions: &[&str]) -> Self {
        init_logging();
        Self {
            extensions: extensions.iter().map(|e| (*e).to_owned()).collect(),
            next_handle: Cell::new(1),
            calls: RefCell::new(Vec::new()),
            fail_compile: Cell::new(false),
            fail_link: Cell::new(false),
            framebuffer_status: Cell::new(glow::FRAMEBUFFER_COMPLETE),
            renderbuffer_attachments: RefCell::new(Vec::new()),
            bound_framebuffer: Cell::new(None),
            fail_create: Cell::new(None),
            queued_errors: RefCell::new(VecDeque::new()),
            persistent_error: Cell::new(None),
        }
    }

    /// Number of times the entry point `name` was called.
    pub fn count(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|c| **c == name).count()
    }

    /// Total number of recorded GL calls, extension queries included.
    pub fn total_calls(&self) -> usize {
        self.calls.borrow().len()
    }

    fn record(&self, name: &'static str) {
        self.calls.borrow_mut().push(name);
    }

    fn handle(&self, name: &'static str) -> Result<u32, String> {
        self.record(name);
        if self.fail_create.get() == Some(name) {
            return Err("out of memory".to_owned());
        }
        let handle = self.next_handle.get();
        self.next_handle.set(handle + 1);
        Ok(handle)
    }
}

impl GlDevice for MockGl {
    type Shader = u32;
    type Program = u32;
    type Framebuffer = u32;
    type Texture = u32;
    type Renderbuffer = u32;

    fn supports_extension(&self, name: &str) -> bool {
        self.record("supports_extension");
        self.extensions.contains(name)
    }

    unsafe fn get_error(&self) -> u32 {
        self.record("get_error");
        self.queued_errors
            .borrow_mut()
            .pop_front()
            .or(self.persistent_error.get())
            .unwrap_or(glow::NO_ERROR)
    }

    unsafe fn create_shader(&self, _shader_type: u32) -> Result<u32, String> {
        self.handle("create_shader")
    }

    unsafe fn shader_source(&self, _shader: u32, _source: &str) {
        self.record("shader_source");
    }

    unsafe fn compile_shader(&self, _shader: u32) {
        self.record("compile_shader");
    }

    unsafe fn get_shader_compile_status(&self, _shader: u32) -> bool {
        self.record("get_shader_compile_status");
        !self.fail_compile.get()
    }

    unsafe fn get_shader_info_log(&self, _shader: u32) -> String {
        self.record("get_shader_info_log");
        "0:1(1): error: syntax error".to_owned()
    }

    unsafe fn delete_shader(&self, _shader: u32) {
        self.record("delete_shader");
    }

    unsafe fn create_program(&self) -> Result<u32, String> {
        self.handle("create_program")
    }

    unsafe fn attach_shader(&self, _program: u32, _shader: u32) {
        self.record("attach_shader");
    }

    unsafe fn link_program(&self, _program: u32) {
        self.record("link_program");
    }

    unsafe fn get_program_link_status(&self, _program: u32) -> bool {
        self.record("get_program_link_status");
        !self.fail_link.get()
    }

    unsafe fn get_program_info_log(&self, _program: u32) -> String {
        self.record("get_program_info_log");
        "error: unresolved varying".to_owned()
    }

    unsafe fn delete_program(&self, _program: u32) {
        self.record("delete_program");
    }

    unsafe fn create_framebuffer(&self) -> Result<u32, String> {
        self.handle("create_framebuffer")
    }

    unsafe fn bind_framebuffer(&self, _target: u32, framebuffer: Option<u32>) {
        self.record("bind_framebuffer");
        self.bound_framebuffer.set(framebuffer);
    }

    unsafe fn framebuffer_texture_2d(
        &self,
        _target: u32,
        _attachment: u32,
        _texture_target: u32,
        _texture: Option<u32>,
        _level: i32,
    ) {
        self.record("framebuffer_texture_2d");
    }

    unsafe fn framebuffer_renderbuffer(
        &self,
        _target: u32,
        attachment: u32,
        _renderbuffer_target: u32,
        _renderbuffer: Option<u32>,
    ) {
        self.record("framebuffer_renderbuffer");
        self.renderbuffer_attachments.borrow_mut().push(attachment);
    }

    unsafe fn check_framebuffer_status(&self, _target: u32) -> u32 {
        self.record("check_framebuffer_status");
        self.framebuffer_status.get()
    }

    unsafe fn delete_framebuffer(&self, _framebuffer: u32) {
        self.record("delete_framebuffer");
    }

    unsafe fn create_texture(&self) -> Result<u32, String> {
        self.handle("create_texture")
    }

    unsafe fn bind_texture(&self, _target: u32, _texture: Option<u32>) {
        self.record("bind_texture");
    }

    unsafe fn tex_parameter_i32(&self, _target: u32, _parameter: u32, _value: i32) {
        self.record("tex_parameter_i32");
    }

    unsafe fn tex_image_2d_empty(
        &self,
        _target: u32,
        _internal_format: i32,
        _width: i32,
        _height: i32,
        _format: u32,
        _ty: u32,
    ) {
        self.record("tex_image_2d_empty");
    }

    unsafe fn delete_texture(&self, _texture: u32) {
        self.record("delete_texture");
    }

    unsafe fn create_renderbuffer(&self) -> Result<u32, String> {
        self.handle("create_renderbuffer")
    }

    unsafe fn bind_renderbuffer(&self, _target: u32, _renderbuffer: Option<u32>) {
        self.record("bind_renderbuffer");
    }

    unsafe fn renderbuffer_storage(
        &self,
        _target: u32,
        _internal_format: u32,
        _width: i32,
        _height: i32,
    ) {
        self.record("renderbuffer_storage");
    }

    unsafe fn delete_renderbuffer(&self, _renderbuffer: u32) {
        self.record("delete_renderbuffer");
    }
}

/// Primitive that only reports a convexity.
pub struct TestPrimitive {
    pub convexity: u32,
}

impl crate::types::Primitive for TestPrimitive {
    fn operation(&self) -> crate::types::Operation {
        crate::types::Operation::Intersection
    }

    fn convexity(&self) -> u32 {
        self.convexity
    }

    fn render(&self) {}
}

/// `count` primitives of the given convexity.
pub fn primitives(count: usize, convexity: u32) -> Vec<TestPrimitive> {
    (0..count).map(|_| TestPrimitive { convexity }).collect()
}

/// Borrow a primitive list the way the public API expects it.
pub fn as_refs(primitives: &[TestPrimitive]) -> Vec<&dyn crate::types::Primitive> {
    primitives
        .iter()
        .map(|p| p as &dyn crate::types::Primitive)
        .collect()
}
