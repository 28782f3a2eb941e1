use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap},
};

use crate::domain::HELP_TEXT;
use crate::filter::{Choice, FilterState};
use crate::inputter::InputResult;
use crate::layout::Region;
use crate::lead::{Lead, LeadStatus, tab_counts};
use crate::model::{LeadsPage, Model, Page, ROW_MENU_ITEMS, WIZARD_STEPS};

pub const SIDEBAR_WIDTH: u16 = 26;
pub const APP_BAR_HEIGHT: u16 = 3;
pub const STATUSLINE_HEIGHT: u16 = 1;
pub const TABLE_HEADER_HEIGHT: u16 = 3; // Two borders and the column names
pub const NARROW_HEADER_WIDTH: u16 = 80;
pub const WIDE_FILTER_WIDTH: u16 = 110;
pub const DRAWER_WIDTH: u16 = 48;

const BRAND: Color = Color::Rgb(0x41, 0x69, 0xE1);

/// Width left for page content next to the sidebar.
pub fn content_width(ui_width: u16) -> u16 {
    ui_width.saturating_sub(SIDEBAR_WIDTH)
}

/// Rows a sticky region occupies when rendered `width` columns wide.
pub fn measure_region(region: Region, width: u16) -> u16 {
    match region {
        // Spacer row above the action buttons once they move left
        Region::PageHeader if width < NARROW_HEADER_WIDTH => 5,
        Region::PageHeader => 4,
        // Search box on its own row, the selects below it
        Region::FilterBar if width < WIDE_FILTER_WIDTH => 6,
        Region::FilterBar => 3,
        Region::TabBar => 3,
    }
}

/// Lead rows that fit below the sticky stack.
pub fn table_body_height(ui_height: u16, stack: u16) -> u16 {
    ui_height
        .saturating_sub(APP_BAR_HEIGHT)
        .saturating_sub(STATUSLINE_HEIGHT)
        .saturating_sub(stack)
        .saturating_sub(TABLE_HEADER_HEIGHT)
}

#[derive(Debug)]
pub struct LeadsUI {
    status_timeout: Duration,
}

impl Default for LeadsUI {
    fn default() -> Self {
        Self {
            status_timeout: Duration::from_secs(5),
        }
    }
}

impl LeadsUI {
    pub fn draw(&self, model: &Model, frame: &mut Frame) {
        let [sidebar, column] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
                .areas(frame.area());
        let [app_bar, main, statusline] = Layout::vertical([
            Constraint::Length(APP_BAR_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(STATUSLINE_HEIGHT),
        ])
        .areas(column);

        self.draw_sidebar(model, frame, sidebar);
        self.draw_app_bar(frame, app_bar);
        match model.page() {
            Page::Dashboard => self.draw_dashboard(frame, main),
            Page::Leads => self.draw_leads(model, frame, main),
            Page::Landing => self.draw_landing(frame, main),
            Page::Campaigns => self.draw_campaigns(model, frame, main),
            Page::Templates => self.draw_templates(frame, main),
            Page::Integrations => self.draw_integrations(frame, main),
            Page::Studio => self.draw_studio(frame, main),
        }
        self.draw_statusline(model, frame, statusline);

        if let Some(page) = model.leads_page() {
            if let Some(lead) = page.drawer.and_then(|id| model.lead(id)) {
                self.draw_drawer(lead, frame);
            }
        }
        if model.show_help() {
            self.draw_help(frame);
        }
    }

    fn draw_sidebar(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::new();
        for page in Page::ALL {
            if let Some(section) = page.section() {
                lines.push(Line::from(""));
                lines.push(Line::from(section.to_uppercase()).fg(Color::DarkGray));
            }
            let style = if page == model.page() {
                Style::default().fg(BRAND).add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else if page == Page::Studio {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            lines.push(Line::styled(format!(" {:<22}", page.label()), style));
        }
        let block = Block::default()
            .borders(Borders::RIGHT)
            .title(Line::from(" ● CaririCode • Growth ".bold()));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_app_bar(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::BOTTOM);
        let line = Line::from(vec![
            " ● ".fg(BRAND),
            "Dashboard Growth".bold(),
        ]);
        let right = Line::from(vec!["🔔  ".into(), "<?> help ".blue()]).right_aligned();
        frame.render_widget(Paragraph::new(vec![line, right]).block(block), area);
    }

    fn draw_statusline(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let message = if model.last_status_message_update().elapsed() < self.status_timeout {
            model.status_message()
        } else {
            ""
        };
        let [left, right] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(28)]).areas(area);
        frame.render_widget(Paragraph::new(format!(" {message}")).fg(Color::Gray), left);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                "<Tab>".blue().bold(),
                " page ".into(),
                "<Q>".blue().bold(),
                " quit ".into(),
            ]))
            .right_aligned(),
            right,
        );
    }

    // ------------------------------ Leads page ----------------------------- //

    fn draw_leads(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let Some(page) = model.leads_page() else {
            return;
        };
        let heights = page.heights();
        let offsets = page.offsets();

        let header = band(area, 0, heights.page_header);
        let filters = band(area, offsets.filter_bar, heights.filter_bar);
        let tabs = band(area, offsets.tab_bar, heights.tab_bar);
        let table = band(area, offsets.stack, area.height.saturating_sub(offsets.stack));

        self.draw_page_header(model, frame, header);
        self.draw_filter_bar(model, page, frame, filters);
        self.draw_tab_bar(model, page, frame, tabs);
        self.draw_table(model, page, frame, table);
    }

    fn draw_page_header(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let title = Line::from(" Leads".bold());
        let badges = Line::from(vec![
            " ".into(),
            format!(" {} in total ", model.leads().len()).on_dark_gray(),
            " ".into(),
            " +12% vs last month ".fg(BRAND).add_modifier(Modifier::REVERSED),
        ]);
        let buttons = Line::from(vec![
            " [⭳ Export CSV] ".into(),
            " [+ New lead] ".bold().fg(BRAND),
        ]);
        let lines = if area.width < NARROW_HEADER_WIDTH {
            vec![title, badges, Line::from(""), buttons.left_aligned()]
        } else {
            vec![title, badges, buttons.right_aligned()]
        };
        let block = Block::default().borders(Borders::BOTTOM);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_filter_bar(&self, model: &Model, page: &LeadsPage, frame: &mut Frame, area: Rect) {
        let (search, selects) = if area.width < WIDE_FILTER_WIDTH {
            let [top, bottom] =
                Layout::vertical([Constraint::Length(3), Constraint::Length(3)]).areas(area);
            (top, bottom)
        } else {
            let [left, right] =
                Layout::horizontal([Constraint::Percentage(34), Constraint::Fill(1)]).areas(area);
            (left, right)
        };

        self.draw_search(model, &page.filters, frame, search);

        let f = &page.filters;
        let boxes = [
            ("Owner <o>", f.owner.to_string()),
            ("Origin <s>", f.origin.to_string()),
            ("Status <S>", f.status.to_string()),
            ("Period <p>", f.period.label().to_string()),
        ];
        let cells = Layout::horizontal([Constraint::Fill(1); 4]).split(selects);
        for ((label, value), cell) in boxes.into_iter().zip(cells.iter()) {
            let block = Block::bordered().title(label);
            frame.render_widget(Paragraph::new(format!("⛛ {value} ▾")).block(block), *cell);
        }
    }

    fn draw_search(&self, model: &Model, filters: &FilterState, frame: &mut Frame, area: Rect) {
        let block = Block::bordered().title("Search </>");
        match model.searching() {
            Some(input) => {
                let block = block.border_style(Style::default().fg(BRAND));
                frame.render_widget(Paragraph::new(input.input.as_str()).block(block), area);
                frame.set_cursor_position((search_cursor_x(area, input), area.y + 1));
            }
            None if filters.query.is_empty() => {
                frame.render_widget(
                    Paragraph::new("Search by name or e-mail").fg(Color::DarkGray).block(block),
                    area,
                );
            }
            None => {
                frame.render_widget(Paragraph::new(filters.query.as_str()).block(block), area);
            }
        }
    }

    fn draw_tab_bar(&self, model: &Model, page: &LeadsPage, frame: &mut Frame, area: Rect) {
        let counts = tab_counts(model.leads());
        let titles: Vec<Line> = counts
            .iter()
            .map(|(status, n)| {
                let name = status.map_or("All", LeadStatus::label);
                Line::from(vec![format!(" {name} ").into(), format!("{n} ").dark_gray()])
            })
            .collect();
        let selected = match &page.filters.tab {
            Choice::All => 0,
            Choice::Is(status) => counts
                .iter()
                .position(|(s, _)| *s == Some(*status))
                .unwrap_or(0),
        };
        let tabs = Tabs::new(titles)
            .block(Block::bordered().title("<h/l>"))
            .highlight_style(
                Style::default()
                    .fg(BRAND)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            )
            .select(selected);
        frame.render_widget(tabs, area);
    }

    fn draw_table(&self, model: &Model, page: &LeadsPage, frame: &mut Frame, area: Rect) {
        let visible = model.visible_ids();
        let all_checked = page.selection.all_selected(&visible);

        let header = Row::new(vec![
            Cell::from(checkbox(all_checked)),
            Cell::from("Name"),
            Cell::from("E-mail"),
            Cell::from("Phone"),
            Cell::from("Status"),
            Cell::from("Origin"),
            Cell::from("Owner"),
            Cell::from("Last activity"),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD));

        let body = table_body_height(model.size().1, page.offsets().stack).max(1) as usize;
        let begin = page.offset_row.min(page.rows.len());
        let end = (begin + body).min(page.rows.len());
        let rows: Vec<Row> = page.rows[begin..end]
            .iter()
            .enumerate()
            .map(|(i, &ridx)| {
                let lead = &model.leads()[ridx];
                let pos = begin + i;
                let mut style = if pos % 2 == 0 {
                    Style::default()
                } else {
                    Style::default().bg(Color::Rgb(0x1c, 0x1f, 0x26))
                };
                if pos == page.curser {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                lead_row(lead, page.selection.contains(lead.id)).style(style)
            })
            .collect();

        let title = if page.selection.is_empty() {
            Line::from(format!(" {} of {} leads ", page.rows.len(), model.leads().len()))
        } else {
            Line::from(vec![
                format!(" {} selected ", page.selection.len()).bold(),
                "· [Send message] [Archive] (unavailable) ".dark_gray(),
            ])
        };
        let widths = [
            Constraint::Length(4),
            Constraint::Min(20),
            Constraint::Min(24),
            Constraint::Length(16),
            Constraint::Length(13),
            Constraint::Length(15),
            Constraint::Length(10),
            Constraint::Length(13),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::bordered().title(title));
        frame.render_widget(table, area);

        let menu_row = page
            .rows
            .iter()
            .position(|&r| Some(model.leads()[r].id) == page.menu_open);
        if let Some(pos) = menu_row {
            let row_y = area.y + 2 + pos.saturating_sub(begin) as u16;
            self.draw_row_menu(page.menu_curser, frame, area, row_y);
        }

        if page.rows.is_empty() {
            let inner = band(area, 2, 1);
            frame.render_widget(
                Paragraph::new("No leads match the current filters.").centered().dark_gray(),
                inner,
            );
        }
    }

    fn draw_row_menu(&self, curser: usize, frame: &mut Frame, table: Rect, row_y: u16) {
        let width = 22;
        let height = ROW_MENU_ITEMS.len() as u16 + 2;
        let area = Rect::new(
            table.right().saturating_sub(width + 1),
            row_y + 1,
            width,
            height,
        )
        .intersection(frame.area());
        let lines: Vec<Line> = ROW_MENU_ITEMS
            .iter()
            .enumerate()
            .map(|(i, item)| {
                if i == curser {
                    Line::from(format!(" {item}")).reversed()
                } else {
                    Line::from(format!(" {item}"))
                }
            })
            .collect();
        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(lines).block(Block::bordered()), area);
    }

    fn draw_drawer(&self, lead: &Lead, frame: &mut Frame) {
        let full = frame.area();
        let width = DRAWER_WIDTH.min(full.width);
        let area = Rect::new(full.right() - width, full.y, width, full.height);
        let lines = vec![
            Line::from(format!("#{}", lead.id)).dark_gray(),
            Line::from(""),
            Line::from(vec![
                format!("({}) ", lead.initials()).fg(BRAND),
                lead.name.as_str().bold(),
            ]),
            Line::from(format!("✉ {}", lead.email)),
            Line::from(format!("☏ {}", lead.phone)),
            Line::from(""),
            status_chip(lead.status).into(),
            Line::from(""),
            Line::from("Origin".dark_gray()),
            Line::from(lead.origin.as_str()),
            Line::from("Owner".dark_gray()),
            Line::from(lead.owner.as_str()),
            Line::from("Last activity".dark_gray()),
            Line::from(lead.last_activity.as_str()),
            Line::from(""),
            Line::from("Quick actions".bold()),
            Line::from("[Send e-mail] [WhatsApp]"),
            Line::from("[Change status] [Assign]"),
        ];
        let block = Block::bordered()
            .title(" Lead details ".bold())
            .title_bottom(Line::from(" <Esc> close ").centered());
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }

    fn draw_help(&self, frame: &mut Frame) {
        let full = frame.area();
        let height = (HELP_TEXT.lines().count() as u16 + 2).min(full.height);
        let width = 60.min(full.width);
        let area = Rect::new(
            full.x + (full.width - width) / 2,
            full.y + (full.height - height) / 2,
            width,
            height,
        );
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(HELP_TEXT).block(Block::bordered().title(" Help ".bold())),
            area,
        );
    }

    // ----------------------------- Other pages ----------------------------- //

    fn draw_dashboard(&self, frame: &mut Frame, area: Rect) {
        let [stats, rest] =
            Layout::vertical([Constraint::Length(5), Constraint::Min(0)]).areas(area);
        let cards = [
            ("Total leads", "2,387", "+12% vs last month"),
            ("LP conversion", "4.8%", "Landing Pages • 30 days"),
            ("Response rate", "32%", "Messages sent"),
            ("Active today", "143", "activity in the last 24h"),
        ];
        let cells = Layout::horizontal([Constraint::Fill(1); 4]).split(stats);
        for ((title, value, hint), cell) in cards.into_iter().zip(cells.iter()) {
            let lines = vec![
                Line::from(title).gray(),
                Line::from(value).bold(),
                Line::from(hint).dark_gray(),
            ];
            frame.render_widget(Paragraph::new(lines).block(Block::bordered()), *cell);
        }

        let [activity, actions] =
            Layout::horizontal([Constraint::Fill(2), Constraint::Fill(1)]).areas(rest);
        let recent = vec![
            Line::from(vec![
                "● ".fg(BRAND),
                "Bruna Carvalho".bold(),
                " replied to a message • 2h ago".into(),
            ]),
            Line::from(vec![
                "● ".gray(),
                "New lead captured via ".into(),
                "Landing Page A/B".bold(),
                " • 4h ago".into(),
            ]),
            Line::from(vec![
                "● ".green(),
                "Campaign ".into(),
                "Welcome WA".bold(),
                " finished • response rate 38%".into(),
            ]),
        ];
        frame.render_widget(
            Paragraph::new(recent).block(Block::bordered().title(" Recent activity ")),
            activity,
        );
        let quick = vec![
            Line::from("[+ New lead]   [New landing]"),
            Line::from(vec!["[New campaign] ".into(), "[Generate content]".dark_gray()]),
            Line::from(""),
            Line::from("* AI Studio and bulk sending will be enabled in future versions.")
                .dark_gray(),
        ];
        frame.render_widget(
            Paragraph::new(quick)
                .wrap(Wrap { trim: true })
                .block(Block::bordered().title(" Quick actions ")),
            actions,
        );
    }

    fn draw_landing(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(vec![" Landing Pages".bold(), "   [+ New landing]".fg(BRAND)]),
            Line::from(""),
        ];
        for i in 1..=3 {
            lines.push(Line::from(vec![format!(" LP {i} ").bold(), "active".dark_gray()]));
            lines.push(Line::from(format!(" 🔗 https://cariricode.growth/lp-{i}")));
            lines.push(Line::from(" [Edit] [Duplicate] [View]"));
            lines.push(Line::from(""));
        }
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_campaigns(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let step = model.wizard_step();
        let mut steps: Vec<Span> = vec![" ".into()];
        for (i, name) in WIZARD_STEPS.iter().enumerate() {
            let label = format!("({}) {name}", i + 1);
            steps.push(if i + 1 == step { label.fg(BRAND).bold() } else { label.dark_gray() });
            if i + 1 < WIZARD_STEPS.len() {
                steps.push(" ── ".dark_gray());
            }
        }
        let body: Vec<Line> = match step {
            1 => vec![
                "Target: All leads ▾  (New in last 7 days, No contact 14+ days)".into(),
                "Channels: [x] WhatsApp  [ ] Gmail  * integrated accounts only".into(),
                "UTM: utm_campaign ____  utm_content ____".into(),
            ],
            2 => vec![
                "WhatsApp: Write your WhatsApp message...".into(),
                "[Suggest (AI) *] [Insert variable]".into(),
                "Gmail: Subject ____  Body: Write the e-mail body...".into(),
                Line::from("* AI Studio will be released in the future.").dark_gray(),
            ],
            3 => vec![
                "Schedule: date ____  time ____".into(),
                "Speed: Balanced ▾   [ ] Pause if bounce rate rises".into(),
                "Tests: [ ] Send a test to my number/e-mail  [Send test]".into(),
            ],
            _ => vec![
                "✓ Target: All leads".green().into(),
                "✓ Channels: WhatsApp + Gmail".green().into(),
                "✓ Schedule configured".green().into(),
                Line::from("Sending is not enabled in this version yet.").dark_gray(),
            ],
        };
        let back = if step == 1 { "[Back]".dark_gray() } else { "[Back]".into() };
        let next = if step == WIZARD_STEPS.len() {
            "[Finish (future)]".fg(BRAND).bold()
        } else {
            "[Next]".fg(BRAND).bold()
        };

        let mut lines = vec![
            Line::from(" Campaigns (Messages)".bold()),
            Line::from(""),
            Line::from(steps),
            Line::from(""),
        ];
        lines.extend(body.into_iter().map(|l| {
            let mut spans = vec![Span::raw(" ")];
            spans.extend(l.spans);
            Line::from(spans).style(l.style)
        }));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![" ".into(), back, "  <h/l>  ".dark_gray(), next]));
        lines.push(Line::from(""));
        lines.push(
            Line::from(concat!(
                " Bulk sending via WhatsApp and Gmail will be enabled after connecting ",
                "the accounts under Integrations."
            ))
            .dark_gray(),
        );
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
    }

    fn draw_templates(&self, frame: &mut Frame, area: Rect) {
        let rows = [
            ("Welcome", "WhatsApp", "3d ago"),
            ("Onboarding", "Gmail", "8d ago"),
            ("Offer call", "WhatsApp", "16d ago"),
        ]
        .into_iter()
        .map(|(n, c, d)| Row::new(vec![n, c, d]));
        let table = Table::new(
            rows,
            [Constraint::Fill(2), Constraint::Fill(1), Constraint::Fill(1)],
        )
        .header(
            Row::new(vec!["Name", "Channel", "Last edited"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::bordered().title(Line::from(vec![
            " Templates ".bold(),
            "[+ New template] ".fg(BRAND),
        ])));
        frame.render_widget(table, area);
    }

    fn draw_integrations(&self, frame: &mut Frame, area: Rect) {
        let [whatsapp, gmail] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(area);
        let cards = [
            (
                whatsapp,
                " WhatsApp ",
                "Connect your account to send bulk messages and reply to leads.",
            ),
            (gmail, " Gmail ", "Authorize sending and tracking e-mails directly from Growth."),
        ];
        for (cell, title, text) in cards {
            let lines = vec![
                Line::from("not connected").dark_gray(),
                Line::from(text),
                Line::from(""),
                Line::from("[Connect]"),
            ];
            frame.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: true })
                    .block(Block::bordered().title(title.bold())),
                band(cell, 0, 8),
            );
        }
    }

    fn draw_studio(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from("AI Studio (future)").bold(),
            Line::from(""),
            Line::from(
                "Generate copy for campaigns, e-mail subjects and WhatsApp messages from a brief.",
            ),
            Line::from(""),
            Line::from("Describe your product/offer and the desired tone...").dark_gray(),
            Line::from(""),
            Line::from("[Generate ideas]").dark_gray(),
            Line::from(""),
            Line::from("* feature will be released in future versions.").dark_gray(),
        ];
        frame.render_widget(
            Paragraph::new(lines)
                .centered()
                .wrap(Wrap { trim: true })
                .block(Block::bordered()),
            area,
        );
    }
}

/// Horizontal band of `area` starting `offset` rows down, clipped to `area`.
fn band(area: Rect, offset: u16, height: u16) -> Rect {
    Rect::new(area.x, area.y.saturating_add(offset), area.width, height).intersection(area)
}

/// Screen column of the search cursor, kept inside the box borders.
fn search_cursor_x(area: Rect, input: &InputResult) -> u16 {
    let before: String = input.input.chars().take(input.curser_pos).collect();
    let column = u16::try_from(Line::from(before).width()).unwrap_or(u16::MAX);
    area.x
        .saturating_add(1)
        .saturating_add(column)
        .min(area.right().saturating_sub(2))
}

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

fn status_chip(status: LeadStatus) -> Span<'static> {
    let (icon, color) = match status {
        LeadStatus::New => ("👤", BRAND),
        LeadStatus::InProgress => ("✔", Color::Green),
        LeadStatus::Archived => ("🗄", Color::Gray),
    };
    Span::styled(format!("{icon} {}", status.label()), Style::default().fg(color))
}

fn lead_row(lead: &Lead, selected: bool) -> Row<'_> {
    Row::new(vec![
        Cell::from(checkbox(selected)),
        Cell::from(Line::from(vec![
            lead.name.as_str().bold(),
            format!(" #{}", lead.id).dark_gray(),
        ])),
        Cell::from(lead.email.as_str()),
        Cell::from(lead.phone.as_str()),
        Cell::from(status_chip(lead.status)),
        Cell::from(lead.origin.as_str()),
        Cell::from(lead.owner.as_str()),
        Cell::from(lead.last_activity.as_str()),
    ])
}
