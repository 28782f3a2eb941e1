use arboard::Clipboard;
use ratatui::crossterm::event::KeyEvent;
use std::time::Instant;
use tracing::{debug, info, trace};

use crate::domain::{LeadsConfig, LeadsError, Message};
use crate::filter::{FilterState, Selection, visible_ids};
use crate::inputter::{InputResult, Inputter};
use crate::layout::{Region, RegionHeights, ResizeObserver, StickyOffsets, StickySubscription};
use crate::lead::{Lead, LeadId, LeadStatus, distinct_origins, distinct_owners};
use crate::ui::{content_width, measure_region, table_body_height};

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Leads,
    Landing,
    Campaigns,
    Templates,
    Integrations,
    Studio,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::Dashboard,
        Page::Leads,
        Page::Landing,
        Page::Campaigns,
        Page::Templates,
        Page::Integrations,
        Page::Studio,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Leads => "Leads",
            Page::Landing => "Landing Pages",
            Page::Campaigns => "Campaigns",
            Page::Templates => "Templates",
            Page::Integrations => "Integrations",
            Page::Studio => "AI Studio (soon)",
        }
    }

    /// Sidebar group heading shown above the first page of each group.
    pub fn section(self) -> Option<&'static str> {
        match self {
            Page::Dashboard => Some("Main"),
            Page::Campaigns => Some("Messaging"),
            Page::Integrations => Some("Settings"),
            _ => None,
        }
    }

    fn step(self, forward: bool) -> Self {
        let n = Page::ALL.len();
        let idx = Page::ALL.iter().position(|&p| p == self).unwrap_or(0);
        let next = if forward { (idx + 1) % n } else { (idx + n - 1) % n };
        Page::ALL[next]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    BROWSE,
    SEARCH,
    DRAWER,
    MENU,
    POPUP,
}

pub const ROW_MENU_ITEMS: [&str; 5] = [
    "Open",
    "Send e-mail",
    "WhatsApp",
    "Mark in progress",
    "Archive",
];
pub const WIZARD_STEPS: [&str; 4] = ["Segment", "Message", "Schedule", "Review"];

/// State of the mounted leads page. Dropped when another page is shown, which
/// resets the filters and releases the sticky stack observation.
pub struct LeadsPage {
    pub filters: FilterState,
    pub rows: Vec<usize>, // Indices into Model.leads of the visible leads
    pub selection: Selection,
    pub curser: usize, // Index into rows
    pub offset_row: usize,
    pub drawer: Option<LeadId>,
    pub menu_open: Option<LeadId>,
    pub menu_curser: usize,
    sticky: StickySubscription,
}

impl LeadsPage {
    pub fn offsets(&self) -> StickyOffsets {
        self.sticky.offsets()
    }

    pub fn heights(&self) -> RegionHeights {
        self.sticky.heights()
    }
}

pub struct Model {
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    page: Page,
    leads: Vec<Lead>,
    owners: Vec<String>,
    origins: Vec<String>,
    leads_page: Option<LeadsPage>,
    wizard_step: usize,
    observer: ResizeObserver,
    width: u16,
    height: u16,
    clipboard: Option<Clipboard>,
    input: Inputter,
    last_input: InputResult,
    status_message: String,
    last_status_message_update: Instant,
}

impl Model {
    pub fn init(
        config: &LeadsConfig,
        leads: Vec<Lead>,
        ui_width: u16,
        ui_height: u16,
    ) -> Self {
        let owners = distinct_owners(&leads);
        let origins = distinct_origins(&leads);
        debug!("Owners {:?}, origins {:?}", owners, origins);
        let status_message = match &config.data_path {
            Some(path) => format!("Loaded {} leads from {}", leads.len(), path.display()),
            None => format!("Showing {} sample leads", leads.len()),
        };
        Self {
            status: Status::READY,
            modus: Modus::BROWSE,
            previous_modus: Modus::BROWSE,
            page: Page::Dashboard,
            leads,
            owners,
            origins,
            leads_page: None,
            wizard_step: 1,
            observer: ResizeObserver::default(),
            width: ui_width,
            height: ui_height,
            clipboard: None,
            input: Inputter::default(),
            last_input: InputResult::default(),
            status_message,
            last_status_message_update: Instant::now(),
        }
    }

    // ------------------------------ Accessors ------------------------------ //

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn leads_page(&self) -> Option<&LeadsPage> {
        self.leads_page.as_ref()
    }

    pub fn wizard_step(&self) -> usize {
        self.wizard_step
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn last_status_message_update(&self) -> Instant {
        self.last_status_message_update
    }

    pub fn show_help(&self) -> bool {
        self.modus == Modus::POPUP
    }

    pub fn searching(&self) -> Option<&InputResult> {
        (self.modus == Modus::SEARCH).then_some(&self.last_input)
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn lead(&self, id: LeadId) -> Option<&Lead> {
        self.leads.iter().find(|l| l.id == id)
    }

    pub fn cursor_lead(&self) -> Option<&Lead> {
        let page = self.leads_page.as_ref()?;
        page.rows.get(page.curser).map(|&r| &self.leads[r])
    }

    pub fn visible_ids(&self) -> Vec<LeadId> {
        self.leads_page
            .as_ref()
            .map(|p| visible_ids(&self.leads, &p.rows))
            .unwrap_or_default()
    }

    pub fn raw_keyevents(&self) -> bool {
        self.modus == Modus::SEARCH
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.last_status_message_update = Instant::now();
    }

    // ------------------------------- Update -------------------------------- //

    pub fn update(&mut self, message: Option<Message>) -> Result<(), LeadsError> {
        let Some(msg) = message else {
            return Ok(());
        };
        trace!("Update: Page {:?}, Modus {:?}, Message {:?}", self.page, self.modus, msg);

        match msg {
            Message::Quit if self.modus != Modus::SEARCH => {
                self.quit();
                return Ok(());
            }
            Message::Resize(width, height) => {
                self.ui_resize(width, height);
                return Ok(());
            }
            _ => {}
        }

        match self.modus {
            Modus::BROWSE => match msg {
                Message::Help => self.show_help_popup(),
                Message::NextPage => self.set_page(self.page.step(true)),
                Message::PrevPage => self.set_page(self.page.step(false)),
                _ => match self.page {
                    Page::Leads => self.update_leads(msg),
                    Page::Campaigns => self.update_campaigns(msg),
                    _ => {}
                },
            },
            Modus::SEARCH => {
                if let Message::RawKey(key) = msg {
                    self.raw_input(key)
                }
            }
            Modus::DRAWER => match msg {
                Message::Exit | Message::Enter => self.close_drawer(),
                Message::Help => self.show_help_popup(),
                _ => {}
            },
            Modus::MENU => match msg {
                Message::MoveDown => self.move_menu(1),
                Message::MoveUp => self.move_menu(-1),
                Message::Enter => self.pick_menu_item(),
                Message::Exit | Message::RowMenu => self.close_menu(),
                _ => {}
            },
            Modus::POPUP => {
                if matches!(msg, Message::Exit | Message::Help | Message::Enter) {
                    self.modus = self.previous_modus;
                    self.previous_modus = Modus::POPUP;
                }
            }
        }
        Ok(())
    }

    fn update_leads(&mut self, msg: Message) {
        let page_size = self.table_height().max(1);
        match msg {
            Message::MoveDown => self.move_cursor(1),
            Message::MoveUp => self.move_cursor(-1),
            Message::MovePageDown => self.move_cursor(page_size as isize),
            Message::MovePageUp => self.move_cursor(-(page_size as isize)),
            Message::MoveBeginning => self.move_cursor(isize::MIN / 2),
            Message::MoveEnd => self.move_cursor(isize::MAX / 2),
            Message::MoveLeft => {
                self.change_filters(|f, _, _| f.tab = f.tab.prev(&LeadStatus::ALL))
            }
            Message::MoveRight => {
                self.change_filters(|f, _, _| f.tab = f.tab.next(&LeadStatus::ALL))
            }
            Message::CycleOwner => {
                self.change_filters(|f, owners, _| f.owner = f.owner.next(owners))
            }
            Message::CycleOrigin => {
                self.change_filters(|f, _, origins| f.origin = f.origin.next(origins))
            }
            Message::CycleStatus => {
                self.change_filters(|f, _, _| f.status = f.status.next(&LeadStatus::ALL))
            }
            Message::CyclePeriod => self.change_filters(|f, _, _| f.period = f.period.next()),
            Message::Search => self.enter_search(),
            Message::ToggleRow => self.toggle_row(),
            Message::ToggleAll => self.toggle_all(),
            Message::Enter => self.open_drawer(),
            Message::RowMenu => self.open_menu(),
            Message::CopyEmail => self.copy_field(|l| l.email.clone(), "e-mail"),
            Message::CopyPhone => self.copy_field(|l| l.phone.clone(), "phone"),
            _ => {}
        }
    }

    fn update_campaigns(&mut self, msg: Message) {
        match msg {
            Message::MoveLeft => {
                // Back is disabled on the first step
                if self.wizard_step > 1 {
                    self.wizard_step -= 1;
                }
            }
            Message::MoveRight | Message::Enter => {
                if self.wizard_step == WIZARD_STEPS.len() {
                    self.set_status_message("Sending is not enabled in this version.");
                } else {
                    self.wizard_step += 1;
                }
            }
            _ => {}
        }
        trace!("Campaign wizard at step {}", self.wizard_step);
    }

    // ------------------------- Page mount / unmount ------------------------ //

    fn set_page(&mut self, page: Page) {
        if page == self.page {
            return;
        }
        trace!("Switching page {:?} -> {:?}", self.page, page);
        match self.page {
            Page::Leads => self.leads_page = None,
            Page::Campaigns => self.wizard_step = 1,
            _ => {}
        }
        self.page = page;
        if page == Page::Leads {
            self.mount_leads_page();
        }
    }

    fn mount_leads_page(&mut self) {
        let width = content_width(self.width);
        let sticky = self
            .observer
            .observe(&Region::STACK, &|r| Some(measure_region(r, width)));
        let filters = FilterState::default();
        let rows = filters.apply(&self.leads);
        self.leads_page = Some(LeadsPage {
            filters,
            rows,
            selection: Selection::default(),
            curser: 0,
            offset_row: 0,
            drawer: None,
            menu_open: None,
            menu_curser: 0,
            sticky,
        });
    }

    fn ui_resize(&mut self, width: u16, height: u16) {
        trace!(
            "UI was resized! w:{}->{}, h:{}->{}",
            self.width, width, self.height, height
        );
        self.width = width;
        self.height = height;
        let cw = content_width(width);
        self.observer.notify(&|r| Some(measure_region(r, cw)));
        self.scroll_to_cursor();
    }

    fn table_height(&self) -> usize {
        let stack = self.leads_page.as_ref().map_or(0, |p| p.offsets().stack);
        table_body_height(self.height, stack) as usize
    }

    // ------------------------------ Leads page ----------------------------- //

    fn change_filters(&mut self, change: impl FnOnce(&mut FilterState, &[String], &[String])) {
        let Some(page) = self.leads_page.as_mut() else {
            return;
        };
        change(&mut page.filters, &self.owners, &self.origins);
        self.rederive();
    }

    fn rederive(&mut self) {
        let Some(page) = self.leads_page.as_mut() else {
            return;
        };
        let start_time = Instant::now();
        page.rows = page.filters.apply(&self.leads);
        trace!(
            "Derived {} of {} leads in {}us with {:?}",
            page.rows.len(),
            self.leads.len(),
            start_time.elapsed().as_micros(),
            page.filters
        );
        page.curser = page.curser.min(page.rows.len().saturating_sub(1));
        self.scroll_to_cursor();
    }

    fn move_cursor(&mut self, delta: isize) {
        let Some(page) = self.leads_page.as_mut() else {
            return;
        };
        if page.rows.is_empty() {
            return;
        }
        let last = page.rows.len() - 1;
        page.curser = page.curser.saturating_add_signed(delta).min(last);
        self.scroll_to_cursor();
    }

    fn scroll_to_cursor(&mut self) {
        let height = self.table_height().max(1);
        let Some(page) = self.leads_page.as_mut() else {
            return;
        };
        if page.curser < page.offset_row {
            page.offset_row = page.curser;
        } else if page.curser >= page.offset_row + height {
            page.offset_row = page.curser + 1 - height;
        }
        // Keep the window full when rows disappear.
        let max_offset = page.rows.len().saturating_sub(height);
        page.offset_row = page.offset_row.min(max_offset);
    }

    fn toggle_row(&mut self) {
        let Some(id) = self.cursor_lead().map(|l| l.id) else {
            return;
        };
        if let Some(page) = self.leads_page.as_mut() {
            page.selection.toggle(id);
        }
    }

    fn toggle_all(&mut self) {
        let visible = self.visible_ids();
        if let Some(page) = self.leads_page.as_mut() {
            page.selection.toggle_all(&visible);
            let n = page.selection.len();
            self.set_status_message(format!("{n} selected"));
        }
    }

    fn enter_search(&mut self) {
        trace!("Entering search mode ...");
        let query = self
            .leads_page
            .as_ref()
            .map(|p| p.filters.query.clone())
            .unwrap_or_default();
        self.input.set(&query);
        self.last_input = self.input.get();
        self.previous_modus = self.modus;
        self.modus = Modus::SEARCH;
    }

    fn raw_input(&mut self, key: KeyEvent) {
        self.last_input = self.input.read(key);
        // Every keystroke re-derives the visible leads.
        let query = self.last_input.input.clone();
        self.change_filters(|f, _, _| f.query = query);
        if self.last_input.finished {
            trace!("Search finished with {:?}", self.last_input);
            self.modus = self.previous_modus;
            self.previous_modus = Modus::SEARCH;
            let n = self.leads_page.as_ref().map_or(0, |p| p.rows.len());
            if self.last_input.canceled {
                self.set_status_message("Search cleared");
            } else {
                self.set_status_message(format!("{n} matching leads"));
            }
        }
    }

    fn open_drawer(&mut self) {
        let Some(id) = self.cursor_lead().map(|l| l.id) else {
            return;
        };
        if let Some(page) = self.leads_page.as_mut() {
            page.drawer = Some(id);
            self.previous_modus = self.modus;
            self.modus = Modus::DRAWER;
        }
    }

    fn close_drawer(&mut self) {
        if let Some(page) = self.leads_page.as_mut() {
            page.drawer = None;
        }
        self.modus = Modus::BROWSE;
        self.previous_modus = Modus::DRAWER;
    }

    fn open_menu(&mut self) {
        let Some(id) = self.cursor_lead().map(|l| l.id) else {
            return;
        };
        if let Some(page) = self.leads_page.as_mut() {
            page.menu_open = Some(id);
            page.menu_curser = 0;
            self.previous_modus = self.modus;
            self.modus = Modus::MENU;
        }
    }

    fn move_menu(&mut self, delta: isize) {
        if let Some(page) = self.leads_page.as_mut() {
            page.menu_curser = page
                .menu_curser
                .saturating_add_signed(delta)
                .min(ROW_MENU_ITEMS.len() - 1);
        }
    }

    fn pick_menu_item(&mut self) {
        let picked = self.leads_page.as_ref().and_then(|p| {
            p.menu_open
                .map(|id| (id, ROW_MENU_ITEMS[p.menu_curser]))
        });
        if let Some((id, item)) = picked {
            info!("Row menu \"{item}\" picked for lead {id}");
            self.set_status_message(format!("\"{item}\" is not available in this prototype."));
        }
        self.close_menu();
    }

    fn close_menu(&mut self) {
        if let Some(page) = self.leads_page.as_mut() {
            page.menu_open = None;
        }
        self.modus = Modus::BROWSE;
        self.previous_modus = Modus::MENU;
    }

    fn show_help_popup(&mut self) {
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
    }

    fn copy_field(&mut self, field: impl Fn(&Lead) -> String, what: &str) {
        let Some(text) = self.cursor_lead().map(field) else {
            return;
        };
        if self.clipboard.is_none() {
            match Clipboard::new() {
                Ok(cb) => self.clipboard = Some(cb),
                Err(e) => {
                    trace!("Error opening clipboard: {:?}", e);
                    self.set_status_message("Clipboard is not available.");
                    return;
                }
            }
        }
        let result = match self.clipboard.as_mut() {
            Some(cb) => cb.set_text(text),
            None => return,
        };
        match result {
            Ok(_) => self.set_status_message(format!("Copied {what} to clipboard.")),
            Err(e) => {
                trace!("Error copying to clipboard: {:?}", e);
                self.set_status_message(format!("Could not copy {what}."));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Choice;
    use crate::lead::seed_leads;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};

    fn model() -> Model {
        Model::init(&LeadsConfig::default(), seed_leads(), 160, 40)
    }

    fn leads_model() -> Model {
        let mut m = model();
        m.update(Some(Message::NextPage)).unwrap();
        assert_eq!(m.page(), Page::Leads);
        m
    }

    fn send(m: &mut Model, msgs: &[Message]) {
        for msg in msgs {
            m.update(Some(msg.clone())).unwrap();
        }
    }

    fn type_query(m: &mut Model, q: &str) {
        m.update(Some(Message::Search)).unwrap();
        for c in q.chars() {
            let key = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
            m.update(Some(Message::RawKey(key))).unwrap();
        }
    }

    fn raw(m: &mut Model, code: KeyCode) {
        let key = KeyEvent::new(code, KeyModifiers::NONE);
        m.update(Some(Message::RawKey(key))).unwrap();
    }

    #[test]
    fn starts_on_dashboard_without_leads_page() {
        let m = model();
        assert_eq!(m.page(), Page::Dashboard);
        assert!(m.leads_page().is_none());
        assert_eq!(m.observer.active(), 0);
    }

    #[test]
    fn mounting_leads_page_observes_sticky_stack() {
        let m = leads_model();
        assert_eq!(m.observer.active(), 1);
        let page = m.leads_page().unwrap();
        assert_eq!(m.visible_ids(), vec![1, 2, 3, 4, 5]);
        let h = page.heights();
        let o = page.offsets();
        assert_eq!(o.filter_bar, h.page_header);
        assert_eq!(o.tab_bar, h.page_header + h.filter_bar);
        assert_eq!(o.stack, o.tab_bar + h.tab_bar);
    }

    #[test]
    fn resize_recomputes_offsets() {
        let mut m = leads_model();
        let wide = m.leads_page().unwrap().offsets();
        send(&mut m, &[Message::Resize(70, 40)]);
        let narrow = m.leads_page().unwrap().offsets();
        assert!(narrow.stack > wide.stack);
        send(&mut m, &[Message::Resize(160, 40)]);
        assert_eq!(m.leads_page().unwrap().offsets(), wide);
    }

    #[test]
    fn leaving_leads_page_releases_observer_and_resets_filters() {
        let mut m = leads_model();
        send(&mut m, &[Message::MoveRight, Message::CycleOwner]);
        assert_eq!(m.visible_ids(), vec![1]);

        send(&mut m, &[Message::NextPage]);
        assert!(m.leads_page().is_none());
        assert_eq!(m.observer.active(), 0);

        send(&mut m, &[Message::PrevPage]);
        let page = m.leads_page().unwrap();
        assert_eq!(page.filters, FilterState::default());
        assert_eq!(m.visible_ids(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn tabs_cycle_through_statuses() {
        let mut m = leads_model();
        send(&mut m, &[Message::MoveRight]);
        assert_eq!(m.visible_ids(), vec![1, 5]);
        send(&mut m, &[Message::MoveRight]);
        assert_eq!(m.visible_ids(), vec![2, 4]);
        send(&mut m, &[Message::MoveRight, Message::MoveRight]);
        assert_eq!(m.leads_page().unwrap().filters.tab, Choice::All);
        send(&mut m, &[Message::MoveLeft]);
        assert_eq!(m.visible_ids(), vec![3]);
    }

    #[test]
    fn owner_and_origin_filters() {
        let mut m = leads_model();
        send(&mut m, &[Message::CycleOwner, Message::CycleOrigin]);
        let page = m.leads_page().unwrap();
        assert_eq!(page.filters.owner, Choice::Is("Lu Vieira".to_string()));
        assert_eq!(page.filters.origin, Choice::Is("Capturador 123".to_string()));
        assert_eq!(m.visible_ids(), vec![1]);
    }

    #[test]
    fn search_rederives_on_every_keystroke() {
        let mut m = leads_model();
        type_query(&mut m, "DA");
        assert!(m.raw_keyevents());
        assert_eq!(m.visible_ids(), vec![4]);
        raw(&mut m, KeyCode::Backspace);
        assert_eq!(m.visible_ids(), vec![3, 4, 5]);
        raw(&mut m, KeyCode::Enter);
        assert!(!m.raw_keyevents());
        assert_eq!(m.leads_page().unwrap().filters.query, "D");
    }

    #[test]
    fn escape_clears_query() {
        let mut m = leads_model();
        type_query(&mut m, "bruna");
        raw(&mut m, KeyCode::Esc);
        assert_eq!(m.leads_page().unwrap().filters.query, "");
        assert_eq!(m.visible_ids(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn quit_key_is_text_while_searching() {
        let mut m = leads_model();
        type_query(&mut m, "q");
        m.update(Some(Message::Quit)).unwrap();
        assert_eq!(m.status, Status::READY);
        raw(&mut m, KeyCode::Enter);
        m.update(Some(Message::Quit)).unwrap();
        assert_eq!(m.status, Status::QUITTING);
    }

    #[test]
    fn select_all_follows_visible_rows() {
        let mut m = leads_model();
        send(&mut m, &[Message::MoveRight, Message::ToggleAll]);
        let sel: Vec<_> = m.leads_page().unwrap().selection.ids().collect();
        assert_eq!(sel, vec![1, 5]);
        send(&mut m, &[Message::ToggleAll]);
        assert!(m.leads_page().unwrap().selection.is_empty());
    }

    #[test]
    fn selection_survives_filter_changes() {
        let mut m = leads_model();
        send(&mut m, &[Message::MoveDown, Message::ToggleRow]);
        type_query(&mut m, "anael");
        raw(&mut m, KeyCode::Enter);
        let page = m.leads_page().unwrap();
        assert_eq!(m.visible_ids(), vec![1]);
        assert!(page.selection.contains(2));
    }

    #[test]
    fn cursor_is_clamped_to_rows() {
        let mut m = leads_model();
        send(&mut m, &[Message::MoveEnd]);
        assert_eq!(m.cursor_lead().unwrap().id, 5);
        send(&mut m, &[Message::MoveDown]);
        assert_eq!(m.cursor_lead().unwrap().id, 5);
        send(&mut m, &[Message::MoveRight, Message::MoveRight]);
        assert_eq!(m.cursor_lead().unwrap().id, 4);
        send(&mut m, &[Message::MoveBeginning]);
        assert_eq!(m.cursor_lead().unwrap().id, 2);
        type_query(&mut m, "nobody");
        assert!(m.cursor_lead().is_none());
        send(&mut m, &[Message::MoveDown]);
    }

    #[test]
    fn small_terminal_scrolls_table() {
        let mut m = leads_model();
        let stack = m.leads_page().unwrap().offsets().stack;
        let body = table_body_height(stack + 2, stack) as usize;
        send(&mut m, &[Message::Resize(160, stack + 2)]);
        send(&mut m, &[Message::MoveEnd]);
        let page = m.leads_page().unwrap();
        assert_eq!(page.curser, 4);
        assert!(page.offset_row + body.max(1) > page.curser);
        assert!(page.offset_row <= page.curser);
    }

    #[test]
    fn drawer_and_menu_overlays() {
        let mut m = leads_model();
        send(&mut m, &[Message::MoveDown, Message::Enter]);
        assert_eq!(m.leads_page().unwrap().drawer, Some(2));
        // Navigation is blocked while the drawer is open
        send(&mut m, &[Message::MoveDown]);
        assert_eq!(m.cursor_lead().unwrap().id, 2);
        send(&mut m, &[Message::Exit]);
        assert_eq!(m.leads_page().unwrap().drawer, None);

        send(&mut m, &[Message::RowMenu, Message::MoveDown, Message::MoveDown]);
        let page = m.leads_page().unwrap();
        assert_eq!(page.menu_open, Some(2));
        assert_eq!(page.menu_curser, 2);
        send(&mut m, &[Message::Enter]);
        assert_eq!(m.leads_page().unwrap().menu_open, None);
        assert!(m.status_message().contains("WhatsApp"));
    }

    #[test]
    fn help_popup_opens_and_closes() {
        let mut m = model();
        send(&mut m, &[Message::Help]);
        assert!(m.show_help());
        send(&mut m, &[Message::NextPage]);
        assert_eq!(m.page(), Page::Dashboard);
        send(&mut m, &[Message::Exit]);
        assert!(!m.show_help());
    }

    #[test]
    fn campaign_wizard_is_bounded() {
        let mut m = model();
        send(&mut m, &[Message::NextPage, Message::NextPage, Message::NextPage]);
        assert_eq!(m.page(), Page::Campaigns);
        send(&mut m, &[Message::MoveLeft]);
        assert_eq!(m.wizard_step(), 1);
        for _ in 0..6 {
            send(&mut m, &[Message::MoveRight]);
        }
        assert_eq!(m.wizard_step(), 4);
        assert!(m.status_message().contains("not enabled"));
        send(&mut m, &[Message::MoveLeft]);
        assert_eq!(m.wizard_step(), 3);
    }

    #[test]
    fn campaign_wizard_restarts_after_leaving_the_page() {
        let mut m = model();
        send(&mut m, &[Message::NextPage, Message::NextPage, Message::NextPage]);
        send(&mut m, &[Message::MoveRight, Message::MoveRight]);
        assert_eq!(m.wizard_step(), 3);
        send(&mut m, &[Message::NextPage, Message::PrevPage]);
        assert_eq!(m.page(), Page::Campaigns);
        assert_eq!(m.wizard_step(), 1);
    }

    #[test]
    fn pages_wrap_around() {
        let mut m = model();
        send(&mut m, &[Message::PrevPage]);
        assert_eq!(m.page(), Page::Studio);
        send(&mut m, &[Message::NextPage]);
        assert_eq!(m.page(), Page::Dashboard);
    }
}
