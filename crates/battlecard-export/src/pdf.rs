//! Minimal PDF 1.4 writer for battle cards.
//!
//! A4 pages, the three standard Helvetica faces in `WinAnsiEncoding`, and
//! uncompressed content streams. Text is word-wrapped against the Helvetica
//! metrics below and flows onto new pages as needed.

use std::fmt::Write as _;

use battlecard_core::{BrandContext, CompetitorProfile};

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 57.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const TITLE_BAND_HEIGHT: f32 = 85.0;
/// Lowest y (measured from the top) that content may reach.
const CONTENT_BOTTOM: f32 = PAGE_HEIGHT - MARGIN;

const BODY_SIZE: f32 = 10.0;
const TABLE_SIZE: f32 = 8.0;
const LEADING: f32 = 1.35;

/// Feature table column widths; they sum to `CONTENT_WIDTH`.
const TABLE_COLUMNS: [f32; 4] = [80.0, 134.0, 134.0, 133.0];
const CELL_PADDING: f32 = 4.0;

#[derive(Debug, Clone, Copy)]
struct Rgb(u8, u8, u8);

const DARK_BLUE: Rgb = Rgb(12, 49, 70);
const BRAND_BLUE: Rgb = Rgb(43, 156, 218);
const LIGHT_BLUE: Rgb = Rgb(238, 249, 255);
const WIN_GREEN: Rgb = Rgb(23, 170, 90);
const TEXT_GREY: Rgb = Rgb(60, 60, 60);
const MUTED_GREY: Rgb = Rgb(100, 100, 100);
const RULE_GREY: Rgb = Rgb(205, 205, 205);
const WHITE: Rgb = Rgb(255, 255, 255);

impl Rgb {
    fn components(self) -> (f32, f32, f32) {
        (
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
    Italic,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Italic => "F3",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
            Font::Italic => "Helvetica-Oblique",
        }
    }
}

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

fn char_width(c: char) -> u16 {
    let code = c as u32;
    if (32..=126).contains(&code) {
        HELVETICA_WIDTHS[(code - 32) as usize]
    } else {
        556
    }
}

fn text_width(text: &str, font: Font, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    #[allow(clippy::cast_precision_loss)]
    let width = units as f32 / 1000.0 * size;
    // Bold glyphs run wider than the regular metrics.
    if font == Font::Bold {
        width * 1.08
    } else {
        width
    }
}

/// Greedy word wrap. Words wider than a full line are split by character.
fn wrap_text(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if text_width(&candidate, font, size) <= max_width {
            line = candidate;
            continue;
        }
        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if text_width(word, font, size) <= max_width {
            line = word.to_string();
            continue;
        }
        for c in word.chars() {
            line.push(c);
            if text_width(&line, font, size) > max_width {
                line.pop();
                lines.push(std::mem::take(&mut line));
                line.push(c);
            }
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Map to `WinAnsiEncoding`; unmappable characters become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' => c as u8,
            '\u{a0}'..='\u{ff}' => u8::try_from(u32::from(c)).unwrap_or(b'?'),
            '\u{20ac}' => 0x80,
            '\u{201a}' => 0x82,
            '\u{0192}' => 0x83,
            '\u{201e}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2020}' => 0x86,
            '\u{2021}' => 0x87,
            '\u{02c6}' => 0x88,
            '\u{2030}' => 0x89,
            '\u{0160}' => 0x8a,
            '\u{2039}' => 0x8b,
            '\u{0152}' => 0x8c,
            '\u{017d}' => 0x8e,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{02dc}' => 0x98,
            '\u{2122}' => 0x99,
            '\u{0161}' => 0x9a,
            '\u{203a}' => 0x9b,
            '\u{0153}' => 0x9c,
            '\u{017e}' => 0x9e,
            '\u{0178}' => 0x9f,
            c if c.is_whitespace() => b' ',
            _ => b'?',
        })
        .collect()
}

/// Encode `text` as a PDF literal string, parentheses included.
fn pdf_string(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + 2);
    out.push(b'(');
    for byte in encode_win_ansi(text) {
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out.push(b')');
    out
}

/// One styled line inside a kill-shot box.
struct CalloutLine {
    font: Font,
    size: f32,
    color: Rgb,
    text: String,
}

impl CalloutLine {
    fn new(font: Font, size: f32, color: Rgb, text: String) -> Self {
        Self {
            font,
            size,
            color,
            text,
        }
    }

    fn height(&self) -> f32 {
        self.size * LEADING
    }
}

/// Page-flowing content builder. `y` is measured from the top of the page.
struct Layout {
    finished: Vec<Vec<u8>>,
    current: Vec<u8>,
    y: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            finished: Vec::new(),
            current: Vec::new(),
            y: MARGIN,
        }
    }

    fn new_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.finished.push(page);
        self.y = MARGIN;
    }

    /// Start a new page unless `height` more points fit on this one.
    fn ensure(&mut self, height: f32) {
        if self.y + height > CONTENT_BOTTOM && self.y > MARGIN {
            self.new_page();
        }
    }

    fn op(&mut self, op: &str) {
        self.current.extend_from_slice(op.as_bytes());
    }

    fn fill_rect(&mut self, x: f32, top: f32, width: f32, height: f32, color: Rgb) {
        let (r, g, b) = color.components();
        self.op(&format!(
            "{r:.3} {g:.3} {b:.3} rg\n{x:.2} {:.2} {width:.2} {height:.2} re f\n",
            PAGE_HEIGHT - top - height
        ));
    }

    fn stroke_rect(&mut self, x: f32, top: f32, width: f32, height: f32) {
        let (r, g, b) = RULE_GREY.components();
        self.op(&format!(
            "{r:.3} {g:.3} {b:.3} RG\n0.5 w\n{x:.2} {:.2} {width:.2} {height:.2} re S\n",
            PAGE_HEIGHT - top - height
        ));
    }

    /// Draw one line of text with its baseline `baseline` points from the top.
    fn text(&mut self, x: f32, baseline: f32, font: Font, size: f32, color: Rgb, text: &str) {
        let (r, g, b) = color.components();
        let mut op = String::new();
        let _ = write!(
            op,
            "BT\n/{} {size:.1} Tf\n{r:.3} {g:.3} {b:.3} rg\n{x:.2} {:.2} Td\n",
            font.resource(),
            PAGE_HEIGHT - baseline
        );
        self.op(&op);
        self.current.extend_from_slice(&pdf_string(text));
        self.op(" Tj\nET\n");
    }

    /// Flowing paragraph at `x`, wrapped to `width`.
    fn paragraph(&mut self, x: f32, width: f32, font: Font, size: f32, color: Rgb, text: &str) {
        let line_height = size * LEADING;
        for line in wrap_text(text, font, size, width) {
            self.ensure(line_height);
            self.y += line_height;
            self.text(x, self.y - size * 0.3, font, size, color, &line);
        }
    }

    fn heading(&mut self, text: &str) {
        self.ensure(40.0);
        self.y += 14.0;
        self.y += 14.0;
        self.text(MARGIN, self.y, Font::Bold, 14.0, DARK_BLUE, text);
        self.y += 6.0;
    }

    fn label(&mut self, text: &str) {
        self.ensure(BODY_SIZE * LEADING * 2.0);
        self.y += 4.0;
        self.paragraph(MARGIN, CONTENT_WIDTH, Font::Bold, BODY_SIZE, DARK_BLUE, text);
    }

    fn body(&mut self, text: &str) {
        self.paragraph(MARGIN, CONTENT_WIDTH, Font::Regular, BODY_SIZE, TEXT_GREY, text);
    }

    fn labeled(&mut self, label: &str, text: &str) {
        self.label(label);
        self.body(text);
    }

    fn bullets<'a>(&mut self, items: impl IntoIterator<Item = &'a str>) {
        for item in items {
            self.paragraph(
                MARGIN + 8.0,
                CONTENT_WIDTH - 8.0,
                Font::Regular,
                BODY_SIZE,
                TEXT_GREY,
                &format!("\u{2022} {item}"),
            );
        }
    }

    /// Feature table with the header repeated on every page. A row taller
    /// than the space left moves to the next page, and a row taller than a
    /// whole page is split line by line across as many pages as it needs.
    fn table(&mut self, header: &[String; 4], rows: &[[String; 4]]) {
        let line_height = TABLE_SIZE * LEADING;
        let header_lines = Self::wrap_cells(header, true);
        let header_height = Self::block_height(&header_lines, line_height);
        let page_capacity = Self::lines_that_fit(MARGIN + header_height, line_height);

        self.ensure(header_height + line_height + 2.0 * CELL_PADDING);
        self.draw_cells(&header_lines, true, line_height);
        let mut fresh = false;

        for row in rows {
            let lines = Self::wrap_cells(row, false);
            let total = lines.iter().map(Vec::len).max().unwrap_or(0).max(1);
            let mut start = 0;
            while start < total {
                let room = Self::lines_that_fit(self.y, line_height);
                let keep_whole = start == 0 && room < total && total <= page_capacity && !fresh;
                if room == 0 || keep_whole {
                    self.new_page();
                    self.draw_cells(&header_lines, true, line_height);
                    fresh = true;
                    continue;
                }
                let end = (start + room).min(total);
                let slice: Vec<&[String]> = lines
                    .iter()
                    .map(|cell| &cell[start.min(cell.len())..end.min(cell.len())])
                    .collect();
                self.draw_cells(&slice, false, line_height);
                fresh = false;
                start = end;
            }
        }
    }

    fn cell_style(header: bool, column: usize) -> (Font, Rgb) {
        match (header, column) {
            (true, _) => (Font::Bold, WHITE),
            (false, 0) => (Font::Bold, DARK_BLUE),
            (false, 3) => (Font::Bold, WIN_GREEN),
            (false, _) => (Font::Regular, TEXT_GREY),
        }
    }

    fn wrap_cells(cells: &[String; 4], header: bool) -> Vec<Vec<String>> {
        cells
            .iter()
            .zip(TABLE_COLUMNS)
            .enumerate()
            .map(|(column, (cell, width))| {
                let (font, _) = Self::cell_style(header, column);
                wrap_text(cell, font, TABLE_SIZE, width - 2.0 * CELL_PADDING)
            })
            .collect()
    }

    #[allow(clippy::cast_precision_loss)]
    fn block_height<S: AsRef<[String]>>(cells: &[S], line_height: f32) -> f32 {
        let lines = cells.iter().map(|c| c.as_ref().len()).max().unwrap_or(1).max(1);
        lines as f32 * line_height + 2.0 * CELL_PADDING
    }

    /// Table lines that fit between `top` and the bottom margin.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn lines_that_fit(top: f32, line_height: f32) -> usize {
        ((CONTENT_BOTTOM - top - 2.0 * CELL_PADDING) / line_height).floor().max(0.0) as usize
    }

    /// Draw one row of cells at the current position without paginating.
    fn draw_cells<S: AsRef<[String]>>(&mut self, cells: &[S], header: bool, line_height: f32) {
        let height = Self::block_height(cells, line_height);
        let top = self.y;

        if header {
            self.fill_rect(MARGIN, top, CONTENT_WIDTH, height, BRAND_BLUE);
        }
        let mut x = MARGIN;
        for (column, (lines, width)) in cells.iter().zip(TABLE_COLUMNS).enumerate() {
            self.stroke_rect(x, top, width, height);
            let (font, color) = Self::cell_style(header, column);
            let mut baseline = top + CELL_PADDING;
            for line in lines.as_ref() {
                baseline += line_height;
                self.text(
                    x + CELL_PADDING,
                    baseline - TABLE_SIZE * 0.3,
                    font,
                    TABLE_SIZE,
                    color,
                    line,
                );
            }
            x += width;
        }
        self.y = top + height;
    }

    /// Boxed kill shot. When the box would run past the bottom margin it is
    /// closed there and continued on the next page.
    fn callout(&mut self, title: &str, statement: &str, talk_track: &str) {
        const PAD: f32 = 10.0;
        let inner = CONTENT_WIDTH - 20.0;

        let mut lines = vec![CalloutLine::new(Font::Bold, BODY_SIZE, DARK_BLUE, title.to_string())];
        lines.extend(
            wrap_text(&format!("\"{statement}\""), Font::Italic, BODY_SIZE, inner)
                .into_iter()
                .map(|l| CalloutLine::new(Font::Italic, BODY_SIZE, TEXT_GREY, l)),
        );
        lines.extend(
            wrap_text(&format!("Talk Track: {talk_track}"), Font::Regular, TABLE_SIZE, inner)
                .into_iter()
                .map(|l| CalloutLine::new(Font::Regular, TABLE_SIZE, MUTED_GREY, l)),
        );

        let height: f32 = 2.0 * PAD + lines.iter().map(CalloutLine::height).sum::<f32>();
        if height <= CONTENT_BOTTOM - MARGIN {
            self.ensure(height + 8.0);
        } else {
            self.ensure(2.0 * PAD + 3.0 * BODY_SIZE * LEADING);
        }

        let mut rest = lines.as_slice();
        while !rest.is_empty() {
            let available = CONTENT_BOTTOM - self.y - 2.0 * PAD;
            let mut used = 0.0;
            let mut take = 0;
            for line in rest {
                if used + line.height() > available {
                    break;
                }
                used += line.height();
                take += 1;
            }
            if take == 0 {
                if self.y > MARGIN {
                    self.new_page();
                    continue;
                }
                take = 1;
                used = rest[0].height();
            }

            let (chunk, tail) = rest.split_at(take);
            let top = self.y;
            let box_height = used + 2.0 * PAD;
            self.fill_rect(MARGIN, top, CONTENT_WIDTH, box_height, LIGHT_BLUE);
            self.fill_rect(MARGIN, top, 4.0, box_height, BRAND_BLUE);
            self.stroke_rect(MARGIN, top, CONTENT_WIDTH, box_height);

            let mut cursor = top + PAD;
            for line in chunk {
                cursor += line.height();
                let baseline = cursor - line.size * (LEADING - 1.0);
                self.text(MARGIN + 12.0, baseline, line.font, line.size, line.color, &line.text);
            }
            self.y = top + box_height;

            rest = tail;
            if !rest.is_empty() {
                self.new_page();
            }
        }
        self.y += 8.0;
    }

    /// Close the last page and stamp page numbers. The footer goes first in
    /// each stream so text flowing across a page break stays contiguous.
    fn finish(mut self) -> Vec<Vec<u8>> {
        self.new_page();
        let total = self.finished.len();
        let pages = std::mem::take(&mut self.finished);
        pages
            .into_iter()
            .enumerate()
            .map(|(index, page)| {
                let mut footer = Layout::new();
                footer.text(
                    PAGE_WIDTH - MARGIN - 60.0,
                    PAGE_HEIGHT - 25.0,
                    Font::Regular,
                    TABLE_SIZE,
                    MUTED_GREY,
                    &format!("Page {} of {total}", index + 1),
                );
                let mut stamped = footer.current;
                stamped.extend_from_slice(&page);
                stamped
            })
            .collect()
    }
}

fn layout(profile: &CompetitorProfile, brand: &BrandContext) -> Vec<Vec<u8>> {
    let mut doc = Layout::new();
    let name = profile.name.as_str();

    let mut band = Vec::new();
    let mut baseline = 28.0;
    for line in wrap_text(&format!("{} vs {name}", brand.name), Font::Bold, 18.0, CONTENT_WIDTH) {
        baseline += 22.0;
        band.push((baseline, Font::Bold, 18.0, line));
    }
    baseline += 4.5;
    for line in wrap_text(&profile.title, Font::Regular, BODY_SIZE, CONTENT_WIDTH) {
        baseline += BODY_SIZE * LEADING;
        band.push((baseline, Font::Regular, BODY_SIZE, line));
    }
    let band_height = TITLE_BAND_HEIGHT.max(baseline + 17.0);
    doc.fill_rect(0.0, 0.0, PAGE_WIDTH, band_height, DARK_BLUE);
    for (baseline, font, size, line) in band {
        doc.text(MARGIN, baseline, font, size, WHITE, &line);
    }
    doc.y = band_height + 5.0;

    doc.heading("1. Executive Summary");
    doc.labeled("Verdict:", &profile.summary.verdict);
    doc.labeled("Pricing Reality:", &profile.pricing_reality());
    doc.labeled("Market Position:", &profile.momentum.market_position);
    doc.labeled("Platform Focus:", &profile.platform_coverage.summary);
    doc.label(&format!("Weaknesses ({name}):"));
    doc.bullets(profile.summary.pain_points.iter().map(String::as_str));
    let gaps: Vec<String> = profile
        .feature_gaps()
        .map(|gap| format!("{}: {}", gap.category, gap.reality))
        .collect();
    doc.bullets(gaps.iter().map(String::as_str));
    doc.label(&format!("{} Advantages:", brand.name));
    doc.bullets(profile.summary.advantages.iter().map(String::as_str));

    doc.heading("2. Feature Reality Check");
    let header = [
        "Category".to_string(),
        format!("{name} Promise"),
        "Reality Check".to_string(),
        format!("{} Win", brand.name),
    ];
    let rows: Vec<[String; 4]> = profile
        .feature_comparison
        .iter()
        .map(|f| {
            [
                f.category.clone(),
                f.competitor_claim.clone(),
                f.reality.clone(),
                f.counter_advantage.clone(),
            ]
        })
        .collect();
    doc.y += 4.0;
    doc.table(&header, &rows);

    doc.heading("3. Momentum & Development");
    doc.labeled("Market Position:", &profile.momentum.market_position);
    doc.labeled("Recent Updates:", &profile.momentum.recent_updates);

    doc.heading("4. Platform Coverage");
    doc.body(&profile.platform_coverage.summary);
    doc.label("Strong Platforms:");
    doc.bullets(profile.platform_coverage.strengths.iter().map(String::as_str));

    doc.heading("5. Pricing & Scaling");
    doc.labeled("Entry Price:", &profile.pricing.entry);
    doc.label("Hidden Costs:");
    doc.bullets(profile.pricing.cons.iter().map(String::as_str));

    doc.heading("6. Red Flags & Win Signals");
    doc.label("Warnings:");
    doc.bullets(profile.red_flags.warnings.iter().map(String::as_str));
    doc.label("Win Signals:");
    doc.bullets(profile.red_flags.win_signals.iter().map(String::as_str));

    doc.heading("7. Review Intelligence");
    doc.labeled("Market Consensus:", &profile.review_analysis.competitor_consensus);
    doc.labeled(&format!("Vs {}:", brand.name), &profile.review_analysis.head_to_head);
    doc.label(&format!(
        "Review Volume ({} total):",
        profile.total_review_count()
    ));
    let counts: Vec<String> = profile
        .reviews
        .iter()
        .map(|r| format!("{}: {}", r.platform, r.count))
        .collect();
    doc.bullets(counts.iter().map(String::as_str));
    doc.label("Critical Reviews:");
    for review in &profile.critical_reviews {
        doc.paragraph(
            MARGIN + 8.0,
            CONTENT_WIDTH - 8.0,
            Font::Bold,
            BODY_SIZE,
            TEXT_GREY,
            &format!("{} ({}/3 stars) - {}, {}", review.title, review.rating, review.source, review.date),
        );
        doc.paragraph(
            MARGIN + 8.0,
            CONTENT_WIDTH - 8.0,
            Font::Italic,
            BODY_SIZE,
            TEXT_GREY,
            &format!("\"{}\"", review.comment),
        );
    }

    doc.heading("8. Sales Kill Shots");
    for (i, shot) in profile.kill_shots.iter().enumerate() {
        doc.callout(
            &format!("#{}: {}", i + 1, shot.title),
            &shot.statement,
            &shot.talk_track,
        );
    }

    doc.finish()
}

fn assemble(title: &str, pages: Vec<Vec<u8>>) -> Vec<u8> {
    const FIRST_PAGE_OBJECT: usize = 7;

    let page_ids: Vec<usize> = (0..pages.len()).map(|i| FIRST_PAGE_OBJECT + 2 * i).collect();
    let kids = page_ids
        .iter()
        .map(|id| format!("{id} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");

    let mut objects: Vec<Vec<u8>> = vec![
        b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
        format!("<< /Type /Pages /Kids [{kids}] /Count {} >>", pages.len()).into_bytes(),
    ];
    for font in [Font::Regular, Font::Bold, Font::Italic] {
        objects.push(
            format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.base_font()
            )
            .into_bytes(),
        );
    }
    let mut info = b"<< /Title ".to_vec();
    info.extend_from_slice(&pdf_string(title));
    info.extend_from_slice(b" /Producer (battlecard) >>");
    objects.push(info);

    for (page_id, content) in page_ids.iter().zip(pages) {
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH:.0} {PAGE_HEIGHT:.0}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R /F3 5 0 R >> >> /Contents {} 0 R >>",
                page_id + 1
            )
            .into_bytes(),
        );
        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend_from_slice(&content);
        stream.extend_from_slice(b"\nendstream");
        objects.push(stream);
    }

    let mut out = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = write!(xref, "{offset:010} 00000 n \n");
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R /Info 6 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len() + 1
    );
    out.extend_from_slice(xref.as_bytes());
    out
}

/// Paginated A4 battle card: title band, executive summary, feature table,
/// the remaining sections, and boxed kill-shot callouts.
#[must_use]
pub fn export_pdf(profile: &CompetitorProfile, brand: &BrandContext) -> Vec<u8> {
    let pages = layout(profile, brand);
    assemble(&format!("{} vs {}", brand.name, profile.name), pages)
}

/// Recover the text shown by `Tj` operators, one string per operator,
/// joined by spaces. Decodes as Latin-1, which matches `WinAnsiEncoding`
/// for ASCII and the upper half.
#[cfg(test)]
pub(crate) fn extract_text(pdf: &[u8]) -> String {
    let mut strings = Vec::new();
    let mut i = 0;
    while i < pdf.len() {
        if pdf[i] != b'(' {
            i += 1;
            continue;
        }
        let mut text = String::new();
        i += 1;
        while i < pdf.len() && pdf[i] != b')' {
            if pdf[i] == b'\\' && i + 1 < pdf.len() {
                i += 1;
            }
            text.push(char::from(pdf[i]));
            i += 1;
        }
        i += 1;
        if pdf.get(i..).is_some_and(|rest| rest.starts_with(b" Tj")) {
            strings.push(text);
        }
    }
    strings.join(" ")
}
