use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use web_sys::CanvasRenderingContext2d;

use super::state::ForceGraphState;

type Positions = HashMap<DefaultNodeIdx, (f64, f64)>;

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(&state.options.background);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	let positions = state.positions();
	draw_edges(state, &positions, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &ForceGraphState, positions: &Positions, ctx: &CanvasRenderingContext2d) {
	let style = &state.options.edges;
	let radius = state.options.nodes.radius + state.options.nodes.border_width / 2.0;
	let k = state.transform.k;

	for edge in &state.edges {
		let (Some(&(x1, y1)), Some(&(x2, y2))) = (positions.get(&edge.from), positions.get(&edge.to))
		else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let highlighted = state.is_edge_highlighted(edge);
		let color = if highlighted {
			&edge.color.highlight
		} else {
			&edge.color.color
		};
		let arrow_size = if edge.arrow_to { style.arrow_size } else { 0.0 };
		let (ux, uy) = (dx / dist, dy / dist);

		ctx.set_stroke_style_str(color);
		ctx.set_line_width(if highlighted { style.width * 1.5 } else { style.width });
		ctx.begin_path();
		ctx.move_to(x1 + ux * radius, y1 + uy * radius);
		ctx.line_to(x2 - ux * (radius + arrow_size), y2 - uy * (radius + arrow_size));
		ctx.stroke();

		if edge.arrow_to {
			ctx.set_fill_style_str(color);
			let (tip_x, tip_y) = (x2 - ux * radius, y2 - uy * radius);
			let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
			let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
			ctx.begin_path();
			ctx.move_to(tip_x, tip_y);
			ctx.line_to(back_x + px, back_y + py);
			ctx.line_to(back_x - px, back_y - py);
			ctx.close_path();
			ctx.fill();
		}

		if !edge.label.is_empty() {
			ctx.set_fill_style_str(&style.font_color);
			ctx.set_font(&format!(
				"{}px {}",
				style.font_size / k.max(0.5),
				state.options.nodes.font
			));
			let _ = ctx.fill_text(&edge.label, (x1 + x2) / 2.0, (y1 + y2) / 2.0);
		}
	}
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let style = &state.options.nodes;
	let k = state.transform.k;
	// Neighbours of the hovered node are ringed in the edge highlight colour.
	let edge_highlight = &state.options.edges.highlight;

	state.graph.visit_nodes(|node| {
		let (x, y) = (node.x() as f64, node.y() as f64);
		let info = &node.data.user_data;
		let idx = node.index();
		let (fill, border, border_width) = if state.is_hovered(idx) {
			(
				&info.color.highlight_background,
				&info.color.highlight_border,
				style.border_width * 1.5,
			)
		} else if state.is_neighbor(idx) {
			(&info.color.background, edge_highlight, style.border_width * 1.5)
		} else {
			(&info.color.background, &info.color.border, style.border_width)
		};

		ctx.begin_path();
		let _ = ctx.arc(x, y, style.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(fill);
		ctx.fill();
		ctx.set_stroke_style_str(border);
		ctx.set_line_width(border_width);
		ctx.stroke();

		ctx.set_fill_style_str(&style.font_color);
		ctx.set_font(&format!("{}px {}", style.font_size / k.max(0.5), style.font));
		let _ = ctx.fill_text(&info.label, x + style.radius + 3.0, y + 4.0);
	});
}
