//! The 2D drawing calls the renderers need, so they can target the browser
//! canvas or a headless recorder.

use std::cell::RefCell;
use std::f64::consts::PI;

use log::warn;
use web_sys::CanvasRenderingContext2d;

pub trait Surface {
	fn set_fill_style(&self, style: &str);
	fn set_stroke_style(&self, style: &str);
	fn set_line_width(&self, width: f64);
	fn set_font(&self, font: &str);
	fn set_text_align(&self, align: &str);
	fn set_text_baseline(&self, baseline: &str);
	fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64);
	fn stroke_rect(&self, x: f64, y: f64, w: f64, h: f64);
	fn begin_path(&self);
	fn move_to(&self, x: f64, y: f64);
	fn line_to(&self, x: f64, y: f64);
	fn close_path(&self);
	/// Adds a full circle to the current path.
	fn circle(&self, x: f64, y: f64, radius: f64);
	fn fill(&self);
	fn stroke(&self);
	fn fill_text(&self, text: &str, x: f64, y: f64);
}

impl Surface for CanvasRenderingContext2d {
	fn set_fill_style(&self, style: &str) {
		self.set_fill_style_str(style);
	}

	fn set_stroke_style(&self, style: &str) {
		self.set_stroke_style_str(style);
	}

	fn set_line_width(&self, width: f64) {
		CanvasRenderingContext2d::set_line_width(self, width);
	}

	fn set_font(&self, font: &str) {
		CanvasRenderingContext2d::set_font(self, font);
	}

	fn set_text_align(&self, align: &str) {
		CanvasRenderingContext2d::set_text_align(self, align);
	}

	fn set_text_baseline(&self, baseline: &str) {
		CanvasRenderingContext2d::set_text_baseline(self, baseline);
	}

	fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64) {
		CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
	}

	fn stroke_rect(&self, x: f64, y: f64, w: f64, h: f64) {
		CanvasRenderingContext2d::stroke_rect(self, x, y, w, h);
	}

	fn begin_path(&self) {
		CanvasRenderingContext2d::begin_path(self);
	}

	fn move_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::move_to(self, x, y);
	}

	fn line_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::line_to(self, x, y);
	}

	fn close_path(&self) {
		CanvasRenderingContext2d::close_path(self);
	}

	fn circle(&self, x: f64, y: f64, radius: f64) {
		if let Err(e) = self.arc(x, y, radius, 0.0, 2.0 * PI) {
			warn!("Canvas arc rejected: {:?}", e);
		}
	}

	fn fill(&self) {
		CanvasRenderingContext2d::fill(self);
	}

	fn stroke(&self) {
		CanvasRenderingContext2d::stroke(self);
	}

	fn fill_text(&self, text: &str, x: f64, y: f64) {
		if let Err(e) = CanvasRenderingContext2d::fill_text(self, text, x, y) {
			warn!("Canvas fill_text rejected: {:?}", e);
		}
	}
}

/// A resolved drawing operation captured by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
	FillRect {
		x: f64,
		y: f64,
		w: f64,
		h: f64,
		fill: String,
	},
	StrokeRect {
		x: f64,
		y: f64,
		w: f64,
		h: f64,
		stroke: String,
	},
	Line {
		from: (f64, f64),
		to: (f64, f64),
		stroke: String,
		width: f64,
	},
	Polygon {
		points: Vec<(f64, f64)>,
		fill: String,
	},
	Disc {
		x: f64,
		y: f64,
		radius: f64,
		fill: String,
	},
	Ring {
		x: f64,
		y: f64,
		radius: f64,
		stroke: String,
	},
	Text {
		text: String,
		x: f64,
		y: f64,
		fill: String,
	},
}

#[derive(Clone, Copy, Debug)]
enum PathEl {
	MoveTo(f64, f64),
	LineTo(f64, f64),
	Circle(f64, f64, f64),
}

#[derive(Debug, Default)]
struct Pen {
	fill: String,
	stroke: String,
	width: f64,
	path: Vec<PathEl>,
}

/// Headless surface that resolves every draw call into a [`DrawOp`].
#[derive(Debug, Default)]
pub struct RecordingSurface {
	pen: RefCell<Pen>,
	ops: RefCell<Vec<DrawOp>>,
}

impl RecordingSurface {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn ops(&self) -> Vec<DrawOp> {
		self.ops.borrow().clone()
	}

	pub fn clear(&self) {
		self.ops.borrow_mut().clear();
	}

	/// Every text drawn, in draw order.
	pub fn texts(&self) -> Vec<String> {
		self.ops
			.borrow()
			.iter()
			.filter_map(|op| match op {
				DrawOp::Text { text, .. } => Some(text.clone()),
				_ => None,
			})
			.collect()
	}

	fn push(&self, op: DrawOp) {
		self.ops.borrow_mut().push(op);
	}
}

impl Surface for RecordingSurface {
	fn set_fill_style(&self, style: &str) {
		self.pen.borrow_mut().fill = style.to_string();
	}

	fn set_stroke_style(&self, style: &str) {
		self.pen.borrow_mut().stroke = style.to_string();
	}

	fn set_line_width(&self, width: f64) {
		self.pen.borrow_mut().width = width;
	}

	fn set_font(&self, _font: &str) {}

	fn set_text_align(&self, _align: &str) {}

	fn set_text_baseline(&self, _baseline: &str) {}

	fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64) {
		let fill = self.pen.borrow().fill.clone();
		self.push(DrawOp::FillRect { x, y, w, h, fill });
	}

	fn stroke_rect(&self, x: f64, y: f64, w: f64, h: f64) {
		let stroke = self.pen.borrow().stroke.clone();
		self.push(DrawOp::StrokeRect { x, y, w, h, stroke });
	}

	fn begin_path(&self) {
		self.pen.borrow_mut().path.clear();
	}

	fn move_to(&self, x: f64, y: f64) {
		self.pen.borrow_mut().path.push(PathEl::MoveTo(x, y));
	}

	fn line_to(&self, x: f64, y: f64) {
		self.pen.borrow_mut().path.push(PathEl::LineTo(x, y));
	}

	fn close_path(&self) {}

	fn circle(&self, x: f64, y: f64, radius: f64) {
		self.pen.borrow_mut().path.push(PathEl::Circle(x, y, radius));
	}

	fn fill(&self) {
		let pen = self.pen.borrow();
		let mut points = Vec::new();
		for el in &pen.path {
			match *el {
				PathEl::MoveTo(x, y) | PathEl::LineTo(x, y) => points.push((x, y)),
				PathEl::Circle(x, y, radius) => self.push(DrawOp::Disc {
					x,
					y,
					radius,
					fill: pen.fill.clone(),
				}),
			}
		}
		if points.len() >= 3 {
			self.push(DrawOp::Polygon {
				points,
				fill: pen.fill.clone(),
			});
		}
	}

	fn stroke(&self) {
		let pen = self.pen.borrow();
		let mut last = None;
		for el in &pen.path {
			match *el {
				PathEl::MoveTo(x, y) => last = Some((x, y)),
				PathEl::LineTo(x, y) => {
					if let Some(from) = last {
						self.push(DrawOp::Line {
							from,
							to: (x, y),
							stroke: pen.stroke.clone(),
							width: pen.width,
						});
					}
					last = Some((x, y));
				}
				PathEl::Circle(x, y, radius) => self.push(DrawOp::Ring {
					x,
					y,
					radius,
					stroke: pen.stroke.clone(),
				}),
			}
		}
	}

	fn fill_text(&self, text: &str, x: f64, y: f64) {
		let fill = self.pen.borrow().fill.clone();
		self.push(DrawOp::Text {
			text: text.to_string(),
			x,
			y,
			fill,
		});
	}
}
