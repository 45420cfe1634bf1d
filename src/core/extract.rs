//! Authored markup → navigation data extractor.
//!
//! Thin walker over `pulldown_cmark` events that turns the authored nav
//! document into a [`NavTree`] and third-level fragments into
//! [`Level3Data`]. Only direct-descendant items of the top-level list are
//! treated as first-level entries; nested lists are either a group's
//! children or a child's third-level reference ids, never both.
//!
//! Extraction never fails: missing lists, malformed items, and unknown
//! arities degrade to empty results or skipped items, logged at `warn`.

use std::ops::Range;

use log::warn;
use pulldown_cmark::{Event, Options, Parser, Tag};

use crate::core::nav::{Level3Data, Level3Item, Logo, NavChild, NavEntry, NavTree, slugify};

type Ev<'a> = (Event<'a>, Range<usize>);

fn parse_events(markup: &str) -> Vec<Ev<'_>> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    Parser::new_ext(markup, opts).into_offset_iter().collect()
}

/// Index of the `End` event balancing the `Start` at `start`.
///
/// Events are well-nested, so a plain depth counter suffices. Unbalanced
/// input degrades to the end of the stream.
fn block_end(events: &[Ev<'_>], start: usize) -> usize {
    let mut depth = 0usize;
    for (i, (event, _)) in events.iter().enumerate().skip(start) {
        match event {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i;
                }
            }
            _ => {}
        }
    }
    events.len().saturating_sub(1)
}

/// Plain text of an event slice: `Text`/`Code` concatenated, breaks as spaces.
fn text_of(events: &[Ev<'_>]) -> String {
    let mut out = String::new();
    for (event, _) in events {
        match event {
            Event::Text(t) | Event::Code(t) => out.push_str(t),
            Event::SoftBreak | Event::HardBreak => out.push(' '),
            _ => {}
        }
    }
    out.trim().to_string()
}

/// Plain text of a standalone markup snippet (used to display opaque
/// `source` fields without re-deriving structure).
pub fn plain_text(markup: &str) -> String {
    text_of(&parse_events(markup))
}

// ── Inline scan ─────────────────────────────────────────────────────────────

/// What a single list item's own inline content contains, ignoring any
/// nested list. Feeds both the label precedence rules and child-item
/// construction.
#[derive(Default)]
struct InlineScan {
    had_paragraph: bool,
    first_paragraph: Option<String>,
    had_break: bool,
    pre_break: String,
    first_link: Option<LinkInfo>,
    full_text: String,
}

struct LinkInfo {
    text: String,
    href: String,
    /// The authored `title` attribute, used as a richer label when present.
    title: String,
}

impl InlineScan {
    fn run(events: &[Ev<'_>]) -> Self {
        let mut scan = InlineScan::default();
        let mut paragraph_buf: Option<String> = None;
        let mut link_buf: Option<LinkInfo> = None;

        for (event, _) in events {
            match event {
                Event::Start(Tag::Paragraph) => {
                    scan.had_paragraph = true;
                    if scan.first_paragraph.is_none() {
                        paragraph_buf = Some(String::new());
                    }
                }
                Event::End(pulldown_cmark::TagEnd::Paragraph) => {
                    if let Some(buf) = paragraph_buf.take() {
                        scan.first_paragraph = Some(buf.trim().to_string());
                    }
                }
                Event::Start(Tag::Link {
                    dest_url, title, ..
                }) => {
                    if link_buf.is_none() && scan.first_link.is_none() {
                        link_buf = Some(LinkInfo {
                            text: String::new(),
                            href: dest_url.to_string(),
                            title: title.to_string(),
                        });
                    }
                }
                Event::End(pulldown_cmark::TagEnd::Link) => {
                    if let Some(mut link) = link_buf.take() {
                        link.text = link.text.trim().to_string();
                        scan.first_link = Some(link);
                    }
                }
                Event::Text(t) | Event::Code(t) => {
                    scan.full_text.push_str(t);
                    if let Some(buf) = paragraph_buf.as_mut() {
                        buf.push_str(t);
                    }
                    if let Some(link) = link_buf.as_mut() {
                        link.text.push_str(t);
                    } else if !scan.had_break {
                        scan.pre_break.push_str(t);
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    scan.had_break = true;
                    scan.full_text.push(' ');
                    if let Some(buf) = paragraph_buf.as_mut() {
                        buf.push(' ');
                    }
                }
                _ => {}
            }
        }
        scan
    }

    /// Label precedence: paragraph text, then text before the first line
    /// break, then the first link's text, then the item's full text.
    /// Authored content mixes plain labels, label+link, and label+break+link
    /// inconsistently; this order resolves all three shapes.
    fn label(&self) -> String {
        if self.had_paragraph
            && let Some(p) = &self.first_paragraph
            && !p.is_empty()
        {
            return p.clone();
        }
        let pre = self.pre_break.trim();
        if self.had_break && !pre.is_empty() {
            return pre.to_string();
        }
        if let Some(link) = &self.first_link
            && !link.text.is_empty()
        {
            return link.text.clone();
        }
        self.full_text.trim().to_string()
    }
}

/// Split an item's event slice into its own inline events and the slice of
/// its first directly-nested list (if any). Deeper lists never leak into
/// the inline scan.
fn split_item<'a, 'e>(events: &'e [Ev<'a>]) -> (Vec<Ev<'a>>, Option<&'e [Ev<'a>]>) {
    let mut own = Vec::new();
    let mut nested: Option<&[Ev<'_>]> = None;
    let mut i = 0;
    while i < events.len() {
        if let Event::Start(Tag::List(_)) = events[i].0 {
            let end = block_end(events, i);
            if nested.is_none() {
                nested = Some(&events[i + 1..end]);
            }
            i = end + 1;
        } else {
            own.push(events[i].clone());
            i += 1;
        }
    }
    (own, nested)
}

/// Iterate the direct items of a list's inner event slice, yielding each
/// item's inner events and full source range.
fn direct_items<'a, 'e>(events: &'e [Ev<'a>]) -> Vec<(&'e [Ev<'a>], Range<usize>)> {
    let mut items = Vec::new();
    let mut i = 0;
    while i < events.len() {
        if let Event::Start(Tag::Item) = events[i].0 {
            let end = block_end(events, i);
            items.push((&events[i + 1..end], events[i].1.clone()));
            i = end + 1;
        } else {
            i += 1;
        }
    }
    items
}

// ── Navigation tree ─────────────────────────────────────────────────────────

/// Build the navigation tree from the authored nav document.
///
/// A leading heading supplies the logo. The first top-level list supplies
/// the first-level entries; an entry is a `Group` iff its item directly
/// contains a nested list.
pub fn build_nav_tree(markup: &str) -> NavTree {
    let events = parse_events(markup);
    let mut tree = NavTree::default();

    let mut i = 0;
    while i < events.len() {
        match &events[i].0 {
            Event::Start(Tag::Heading { .. }) if tree.logo.is_none() => {
                let end = block_end(&events, i);
                let text = text_of(&events[i + 1..end]);
                let source = markup[events[i].1.clone()].trim().to_string();
                if !text.is_empty() {
                    tree.logo = Some(Logo { text, source });
                }
                i = end + 1;
            }
            Event::Start(Tag::List(_)) => {
                let end = block_end(&events, i);
                tree.entries = build_first_level(&events[i + 1..end], markup);
                // Only the first top-level list is the navigation; anything
                // after it is not ours to interpret.
                break;
            }
            _ => i += 1,
        }
    }

    if tree.entries.is_empty() {
        warn!("nav markup has no top-level list; navigation tree is empty");
    }
    tree
}

fn build_first_level(list_events: &[Ev<'_>], markup: &str) -> Vec<NavEntry> {
    let mut entries = Vec::new();
    for (item_events, range) in direct_items(list_events) {
        let (own, nested) = split_item(item_events);
        let scan = InlineScan::run(&own);
        let label = scan.label();
        if label.is_empty() {
            warn!("skipping first-level item with no label");
            continue;
        }
        let source = markup[range].trim().to_string();
        match nested {
            Some(child_events) => entries.push(NavEntry::Group {
                label,
                source,
                children: build_children(child_events, markup),
            }),
            None => entries.push(NavEntry::Leaf {
                label,
                href: scan.first_link.map(|l| l.href).unwrap_or_default(),
                source,
            }),
        }
    }
    entries
}

fn build_children(list_events: &[Ev<'_>], markup: &str) -> Vec<NavChild> {
    let mut children = Vec::new();
    for (item_events, range) in direct_items(list_events) {
        let (own, nested) = split_item(item_events);
        let scan = InlineScan::run(&own);

        let (title, href) = match &scan.first_link {
            Some(link) => {
                let title = if !link.title.is_empty() {
                    link.title.clone()
                } else {
                    link.text.clone()
                };
                (title, link.href.clone())
            }
            // Text-only child: the text is the title, no destination.
            None => (scan.full_text.trim().to_string(), String::new()),
        };
        if title.is_empty() {
            warn!("skipping child item with no title");
            continue;
        }

        let third_level_ids = nested
            .map(|ids_events| {
                direct_items(ids_events)
                    .into_iter()
                    .map(|(id_events, _)| text_of(id_events))
                    .filter(|id| !id.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        children.push(NavChild {
            title,
            href,
            source: markup[range].trim().to_string(),
            third_level_ids,
            third_level: None,
        });
    }
    children
}

// ── Third-level fragments ───────────────────────────────────────────────────

/// Build third-level content from a fragment document.
///
/// The first block supplies the id; each item of the following list is
/// classified purely by how many lines it contains: 1 → `Header`,
/// 3 → `TitleDescription`, 4 → `Square`. Any other arity is dropped with a
/// warning.
pub fn build_level3_data(markup: &str) -> Option<Level3Data> {
    let events = parse_events(markup);

    let mut id = None;
    let mut items = Vec::new();
    let mut i = 0;
    while i < events.len() {
        match &events[i].0 {
            Event::Start(Tag::Heading { .. }) | Event::Start(Tag::Paragraph) if id.is_none() => {
                let end = block_end(&events, i);
                let text = text_of(&events[i + 1..end]);
                if !text.is_empty() {
                    id = Some(slugify(&text));
                }
                i = end + 1;
            }
            Event::Start(Tag::List(_)) => {
                if id.is_some() {
                    let end = block_end(&events, i);
                    items = build_level3_items(&events[i + 1..end], markup);
                    break;
                }
                // A list before the id block is not ours; never mine its
                // paragraphs for an id.
                i = block_end(&events, i) + 1;
            }
            _ => i += 1,
        }
    }

    match id {
        Some(id) if !id.is_empty() => Some(Level3Data { id, items }),
        _ => {
            warn!("third-level fragment has no id block; dropped");
            None
        }
    }
}

fn build_level3_items(list_events: &[Ev<'_>], markup: &str) -> Vec<Level3Item> {
    let mut items = Vec::new();
    for (item_events, range) in direct_items(list_events) {
        let (own, nested) = split_item(item_events);
        if nested.is_some() {
            warn!("nested list inside a third-level block; ignored");
        }
        let lines = item_lines(&own);
        match lines.len() {
            1 => items.push(Level3Item::Header {
                source: markup[range]
                    .trim()
                    .trim_start_matches(['-', '*', '+'])
                    .trim_start()
                    .to_string(),
            }),
            3 => items.push(Level3Item::TitleDescription {
                title: lines[0].text.clone(),
                description: lines[2].text.clone(),
                url: lines[1].url(),
            }),
            4 => items.push(Level3Item::Square {
                title: lines[0].text.clone(),
                url: lines[1].url(),
                description: lines[2].text.clone(),
                footer: lines[3].text.clone(),
            }),
            n => warn!("third-level block with {n} divisions dropped"),
        }
    }
    items
}

/// One authored line of a fragment block.
#[derive(Default)]
struct FragmentLine {
    text: String,
    link_dest: Option<String>,
}

impl FragmentLine {
    fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.link_dest.is_none()
    }

    /// Link destination when the line is a link, else its raw text.
    fn url(&self) -> String {
        self.link_dest
            .clone()
            .unwrap_or_else(|| self.text.trim().to_string())
    }
}

/// Split an item's inline events into lines: breaks and paragraph
/// boundaries both start a new line.
fn item_lines(events: &[Ev<'_>]) -> Vec<FragmentLine> {
    let mut lines: Vec<FragmentLine> = Vec::new();
    let mut current = FragmentLine::default();
    let mut saw_content = false;

    let mut flush = |current: &mut FragmentLine, lines: &mut Vec<FragmentLine>| {
        let mut line = std::mem::take(current);
        line.text = line.text.trim().to_string();
        if !line.is_empty() {
            lines.push(line);
        }
    };

    for (event, _) in events {
        match event {
            Event::Start(Tag::Paragraph) if saw_content => flush(&mut current, &mut lines),
            Event::SoftBreak | Event::HardBreak => flush(&mut current, &mut lines),
            Event::Start(Tag::Link { dest_url, .. }) => {
                saw_content = true;
                if current.link_dest.is_none() {
                    current.link_dest = Some(dest_url.to_string());
                }
            }
            Event::Text(t) | Event::Code(t) => {
                saw_content = true;
                current.text.push_str(t);
            }
            _ => {}
        }
    }
    flush(&mut current, &mut lines);
    lines
}
