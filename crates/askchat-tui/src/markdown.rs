//! Markdown rendering for bot answers.
//!
//! Parses answers with markdown-it (CommonMark plus the table and
//! strikethrough extensions) and produces styled ratatui lines. Fenced
//! code blocks are highlighted with syntect, falling back to plain text
//! for unknown languages.

use markdown_it::parser::core::Root;
use markdown_it::parser::inline::{Text, TextSpecial};
use markdown_it::plugins::cmark::block::blockquote::Blockquote;
use markdown_it::plugins::cmark::block::code::CodeBlock;
use markdown_it::plugins::cmark::block::fence::CodeFence;
use markdown_it::plugins::cmark::block::heading::ATXHeading;
use markdown_it::plugins::cmark::block::hr::ThematicBreak;
use markdown_it::plugins::cmark::block::list::{BulletList, ListItem, OrderedList};
use markdown_it::plugins::cmark::block::paragraph::Paragraph;
use markdown_it::plugins::cmark::inline::backticks::CodeInline;
use markdown_it::plugins::cmark::inline::emphasis::{Em, Strong};
use markdown_it::plugins::cmark::inline::link::Link;
use markdown_it::plugins::cmark::inline::newline::{Hardbreak, Softbreak};
use markdown_it::plugins::extra::strikethrough::Strikethrough;
use markdown_it::plugins::extra::tables::{Table, TableBody, TableCell, TableHead, TableRow};
use markdown_it::{MarkdownIt, Node};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

/// Markdown-to-terminal-markup capability.
///
/// The view code depends on this seam rather than on a concrete engine,
/// so the engine can be swapped without touching the rendering.
pub trait RenderMarkdown {
    /// Render Markdown text to styled lines wrapped to `width` columns.
    fn render(&self, text: &str, width: usize) -> Vec<Line<'static>>;
}

/// Renderer backed by markdown-it and syntect.
pub struct MarkdownView {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl MarkdownView {
    pub fn new() -> Self {
        let theme_set = ThemeSet::load_defaults();
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme: theme_set.themes["base16-ocean.dark"].clone(),
        }
    }
}

impl Default for MarkdownView {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderMarkdown for MarkdownView {
    fn render(&self, text: &str, width: usize) -> Vec<Line<'static>> {
        let ast = parser().parse(text);
        let mut out = Output::new(width, &self.syntax_set, &self.theme);
        walk(&ast, &mut out);
        out.lines
    }
}

/// Create a parser with CommonMark plus the GFM-style extensions the
/// backend answers use (tables, strikethrough).
fn parser() -> MarkdownIt {
    let mut md = MarkdownIt::new();
    markdown_it::plugins::cmark::add(&mut md);
    markdown_it::plugins::extra::tables::add(&mut md);
    markdown_it::plugins::extra::strikethrough::add(&mut md);
    md
}

/// Accumulated output lines plus what block rendering needs.
struct Output<'a> {
    width: usize,
    syntax_set: &'a SyntaxSet,
    theme: &'a Theme,
    lines: Vec<Line<'static>>,
    quote_depth: usize,
}

impl<'a> Output<'a> {
    fn new(width: usize, syntax_set: &'a SyntaxSet, theme: &'a Theme) -> Self {
        Self {
            width,
            syntax_set,
            theme,
            lines: Vec::new(),
            quote_depth: 0,
        }
    }

    /// Insert a blank line between blocks, but never at the start and
    /// never inside a blockquote (the quote marker handles spacing).
    fn block_gap(&mut self) {
        if self.quote_depth > 0 {
            return;
        }
        if let Some(last) = self.lines.last() {
            if !last.spans.is_empty() {
                self.lines.push(Line::from(""));
            }
        }
    }

    /// Word-wrap the spans of one block and append the resulting lines.
    fn push_wrapped(&mut self, spans: Vec<Span<'static>>) {
        self.lines.extend(wrap_spans(spans, self.width));
    }

    /// Append a code block, one output line per input line, highlighted
    /// by syntect when the language is recognized.
    fn push_code(&mut self, code: &str, lang: &str) {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let mut highlighter = HighlightLines::new(syntax, self.theme);

        for raw in code.lines() {
            match highlighter.highlight_line(raw, self.syntax_set) {
                Ok(ranges) => {
                    let spans: Vec<Span<'static>> = ranges
                        .into_iter()
                        .map(|(style, piece)| {
                            let fg = Color::Rgb(
                                style.foreground.r,
                                style.foreground.g,
                                style.foreground.b,
                            );
                            Span::styled(piece.to_string(), Style::default().fg(fg))
                        })
                        .collect();
                    if spans.is_empty() {
                        self.lines.push(Line::from(""));
                    } else {
                        self.lines.push(Line::from(spans));
                    }
                }
                Err(_) => {
                    self.lines.push(Line::from(Span::styled(
                        raw.to_string(),
                        Style::default().fg(Color::Yellow),
                    )));
                }
            }
        }
    }
}

/// Render a block-level node and its children.
fn walk(node: &Node, out: &mut Output<'_>) {
    if node.is::<Root>() {
        for child in node.children.iter() {
            walk(child, out);
        }
        return;
    }

    if node.cast::<ATXHeading>().is_some() {
        out.block_gap();
        let style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        out.push_wrapped(vec![Span::styled(plain_text(node), style)]);
        return;
    }

    if let Some(fence) = node.cast::<CodeFence>() {
        out.block_gap();
        let lang = fence.info.split_whitespace().next().unwrap_or("");
        out.push_code(&fence.content, lang);
        return;
    }

    if let Some(code) = node.cast::<CodeBlock>() {
        out.block_gap();
        out.push_code(&code.content, "");
        return;
    }

    if node.is::<Blockquote>() {
        out.block_gap();
        out.quote_depth += 1;
        let start = out.lines.len();
        for child in node.children.iter() {
            walk(child, out);
        }
        out.quote_depth -= 1;

        let marker = Style::default().fg(Color::DarkGray);
        for line in out.lines[start..].iter_mut() {
            let mut spans = vec![Span::styled("> ".to_string(), marker)];
            spans.extend(line.spans.clone());
            *line = Line::from(spans);
        }
        return;
    }

    if node.is::<BulletList>() {
        out.block_gap();
        for child in node.children.iter() {
            if child.is::<ListItem>() {
                let mut spans = vec![Span::styled(
                    "- ".to_string(),
                    Style::default().fg(Color::Cyan),
                )];
                spans.extend(inline_spans(child));
                out.push_wrapped(spans);
            }
        }
        return;
    }

    if node.is::<OrderedList>() {
        out.block_gap();
        let mut number = 1;
        for child in node.children.iter() {
            if child.is::<ListItem>() {
                let mut spans = vec![Span::styled(
                    format!("{}. ", number),
                    Style::default().fg(Color::Cyan),
                )];
                spans.extend(inline_spans(child));
                out.push_wrapped(spans);
                number += 1;
            }
        }
        return;
    }

    if node.is::<Paragraph>() {
        out.block_gap();
        out.push_wrapped(inline_spans(node));
        return;
    }

    if node.is::<ThematicBreak>() {
        out.block_gap();
        let rule = "\u{2500}".repeat(out.width.clamp(1, 40));
        out.lines.push(Line::from(Span::styled(
            rule,
            Style::default().fg(Color::DarkGray),
        )));
        return;
    }

    if node.is::<Table>() {
        out.block_gap();
        render_table(node, out);
        return;
    }

    for child in node.children.iter() {
        walk(child, out);
    }
}

/// Collect the styled inline spans of a block, resolving nested emphasis
/// by composing style modifiers.
fn inline_spans(node: &Node) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    collect_inline(node, Style::default(), &mut spans);
    spans
}

fn collect_inline(node: &Node, style: Style, spans: &mut Vec<Span<'static>>) {
    for child in node.children.iter() {
        inline_node(child, style, spans);
    }
}

fn inline_node(node: &Node, style: Style, spans: &mut Vec<Span<'static>>) {
    if let Some(text) = node.cast::<Text>() {
        push_span(spans, text.content.clone(), style);
        return;
    }

    if let Some(text) = node.cast::<TextSpecial>() {
        push_span(spans, text.content.clone(), style);
        return;
    }

    if node.is::<Strong>() {
        collect_inline(node, style.add_modifier(Modifier::BOLD), spans);
        return;
    }

    if node.is::<Em>() {
        collect_inline(node, style.add_modifier(Modifier::ITALIC), spans);
        return;
    }

    if node.is::<Strikethrough>() {
        collect_inline(node, style.add_modifier(Modifier::CROSSED_OUT), spans);
        return;
    }

    if node.is::<CodeInline>() {
        push_span(spans, plain_text(node), Style::default().fg(Color::Yellow));
        return;
    }

    if let Some(link) = node.cast::<Link>() {
        let label = plain_text(node);
        let show_url = label != link.url;
        push_span(
            spans,
            label,
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
        );
        if show_url {
            push_span(
                spans,
                format!(" ({})", link.url),
                Style::default().add_modifier(Modifier::DIM),
            );
        }
        return;
    }

    if node.is::<Softbreak>() {
        push_span(spans, " ".to_string(), style);
        return;
    }

    if node.is::<Hardbreak>() {
        // Marker consumed by wrap_spans as a forced line break
        push_span(spans, "\n".to_string(), style);
        return;
    }

    collect_inline(node, style, spans);
}

fn push_span(spans: &mut Vec<Span<'static>>, text: String, style: Style) {
    if !text.is_empty() {
        spans.push(Span::styled(text, style));
    }
}

/// Plain text of a node tree, with breaks collapsed to spaces.
fn plain_text(node: &Node) -> String {
    let mut text = String::new();
    if let Some(t) = node.cast::<Text>() {
        text.push_str(&t.content);
    }
    if let Some(t) = node.cast::<TextSpecial>() {
        text.push_str(&t.content);
    }
    if node.is::<Softbreak>() || node.is::<Hardbreak>() {
        text.push(' ');
    }
    for child in node.children.iter() {
        text.push_str(&plain_text(child));
    }
    text
}

/// Word-wrap a flat span list into lines no wider than `width`.
///
/// A span containing just "\n" forces a line break. A single word longer
/// than the width is kept whole and allowed to overflow.
fn wrap_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0usize;

    for span in spans {
        if span.content.as_ref() == "\n" {
            lines.push(Line::from(std::mem::take(&mut current)));
            used = 0;
            continue;
        }
        let style = span.style;
        for word in span.content.split_whitespace() {
            let word_width = word.chars().count();
            if used > 0 && used + 1 + word_width > width {
                lines.push(Line::from(std::mem::take(&mut current)));
                used = 0;
            }
            let text = if used > 0 {
                format!(" {}", word)
            } else {
                word.to_string()
            };
            used += text.chars().count();
            current.push(Span::styled(text, style));
        }
    }

    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

/// Render a table as padded columns: header row, rule, body rows.
fn render_table(table: &Node, out: &mut Output<'_>) {
    let mut header: Vec<Vec<String>> = Vec::new();
    let mut body: Vec<Vec<String>> = Vec::new();

    for section in table.children.iter() {
        let is_header = section.is::<TableHead>();
        if !is_header && !section.is::<TableBody>() {
            continue;
        }
        for row in section.children.iter() {
            if !row.is::<TableRow>() {
                continue;
            }
            let cells: Vec<String> = row
                .children
                .iter()
                .filter(|c| c.is::<TableCell>())
                .map(|c| plain_text(c).trim().to_string())
                .collect();
            if is_header {
                header.push(cells);
            } else {
                body.push(cells);
            }
        }
    }

    let columns = header
        .iter()
        .chain(body.iter())
        .map(|row| row.len())
        .max()
        .unwrap_or(0);
    if columns == 0 {
        return;
    }

    let mut widths = vec![0usize; columns];
    for row in header.iter().chain(body.iter()) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let header_style = Style::default().add_modifier(Modifier::BOLD);
    for row in &header {
        out.lines.push(table_line(row, &widths, header_style));
    }
    if !header.is_empty() {
        let rule: Vec<String> = widths.iter().map(|w| "\u{2500}".repeat(*w)).collect();
        out.lines.push(table_line(
            &rule,
            &widths,
            Style::default().fg(Color::DarkGray),
        ));
    }
    for row in &body {
        out.lines.push(table_line(row, &widths, Style::default()));
    }
}

/// One table row: cells padded to the column widths, two spaces between.
fn table_line(cells: &[String], widths: &[usize], style: Style) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, width) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        let pad = width.saturating_sub(cell.chars().count());
        let mut text = cell.to_string();
        text.push_str(&" ".repeat(pad));
        if i + 1 < widths.len() {
            text.push_str("  ");
        }
        spans.push(Span::styled(text, style));
    }
    Line::from(spans)
}
