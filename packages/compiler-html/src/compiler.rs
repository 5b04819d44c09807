use covenant_layout::Page;
use covenant_parser::ast::{DocumentNode, DocumentStructure, NodeKind};

use crate::inline::{escape_html, sanitize_inline};

/// Options for markup output
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// One element per line, indented
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Emit `data-id` attributes so consumers can map markup back to nodes
    pub node_ids: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            node_ids: false,
        }
    }
}

impl CompileOptions {
    /// Single-line output, as stored next to the structure
    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Default::default()
        }
    }
}

struct Context<'a> {
    options: &'a CompileOptions,
    depth: usize,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(options: &'a CompileOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn id_attr(&self, node: &DocumentNode) -> String {
        if self.options.node_ids {
            format!(" data-id=\"{}\"", escape_html(&node.id))
        } else {
            String::new()
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Flat markup of the whole structure: title block, then nodes depth-first
///
/// Pure projection of the tree; carries no pagination.
pub fn to_markup(structure: &DocumentStructure) -> String {
    compile_markup(structure, &CompileOptions::compact())
}

/// [`to_markup`] with explicit options
pub fn compile_markup(structure: &DocumentStructure, options: &CompileOptions) -> String {
    let mut ctx = Context::new(options);

    compile_title_block(structure, &mut ctx);
    for node in &structure.nodes {
        compile_node(node, &mut ctx);
    }

    ctx.get_output()
}

/// Print projection: one `<div class="page">` per page, title block on page 1
pub fn compile_print(
    structure: &DocumentStructure,
    pages: &[Page],
    options: &CompileOptions,
) -> String {
    let mut ctx = Context::new(options);

    // A document without nodes still prints its title page
    let blank = [Page {
        number: 1,
        nodes: Vec::new(),
        height: 0,
    }];
    let pages = if pages.is_empty() { &blank[..] } else { pages };
    let total = pages.len();

    ctx.add_line("<div class=\"agreement\">");
    ctx.indent();

    for page in pages {
        ctx.add_line(&format!("<div class=\"page\" data-page=\"{}\">", page.number));
        ctx.indent();

        if page.number == 1 {
            compile_title_block(structure, &mut ctx);
        }
        for node in &page.nodes {
            compile_node(node, &mut ctx);
        }

        ctx.add_line(&format!(
            "<footer class=\"page-number\">{} / {}</footer>",
            page.number, total
        ));

        ctx.dedent();
        ctx.add_line("</div>");
    }

    ctx.dedent();
    ctx.add_line("</div>");

    ctx.get_output()
}

fn compile_title_block(structure: &DocumentStructure, ctx: &mut Context) {
    ctx.add_line("<header class=\"title-block\">");
    ctx.indent();

    ctx.add_line(&format!(
        "<h1 class=\"doc-title\">{}</h1>",
        escape_html(&structure.title)
    ));
    ctx.add_line("<div class=\"doc-meta\">");
    ctx.indent();
    ctx.add_line(&format!(
        "<span class=\"doc-location\">{}</span>",
        escape_html(&structure.location)
    ));
    ctx.add_line(&format!(
        "<span class=\"doc-date\">{}</span>",
        escape_html(&structure.date)
    ));
    ctx.dedent();
    ctx.add_line("</div>");

    ctx.dedent();
    ctx.add_line("</header>");
}

fn compile_node(node: &DocumentNode, ctx: &mut Context) {
    let id = ctx.id_attr(node);

    match node.kind {
        NodeKind::Section => {
            ctx.add_line(&format!(
                "<h2 class=\"section\"{}>{}{}</h2>",
                id,
                label_prefix(node),
                sanitize_inline(&node.content)
            ));
        }
        NodeKind::Subsection => {
            ctx.add_line(&format!(
                "<p class=\"subsection\"{}>{}{}</p>",
                id,
                label_prefix(node),
                sanitize_inline(&node.content)
            ));
        }
        NodeKind::Paragraph => {
            ctx.add_line(&format!(
                "<p class=\"paragraph\"{}>{}</p>",
                id,
                sanitize_inline(&node.content)
            ));
        }
        NodeKind::BulletList => {
            ctx.add_line(&format!("<ul class=\"bullet-list\"{}>", id));
            ctx.indent();
            for item in &node.items {
                ctx.add_line(&format!("<li>{}</li>", sanitize_inline(item)));
            }
            ctx.dedent();
            ctx.add_line("</ul>");
        }
        NodeKind::Unknown => {
            ctx.add_line(&format!(
                "<div class=\"block\"{}>{}</div>",
                id,
                sanitize_inline(&node.content)
            ));
        }
    }

    for child in &node.children {
        compile_node(child, ctx);
    }
}

fn label_prefix(node: &DocumentNode) -> String {
    match &node.label {
        Some(label) => format!("<span class=\"label\">{}.</span> ", escape_html(label)),
        None => String::new(),
    }
}
