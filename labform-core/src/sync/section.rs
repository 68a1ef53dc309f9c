use tracing::{debug, warn};

use super::detector::{ChangeDetector, Inbound};
use crate::engine::{TableAction, TableEngine};
use crate::fingerprint::Snapshot;
use crate::ids::{IdSource, UniqueIds};
use crate::models::{AttachedFile, SectionEntry, SectionName, TableState};

/// What one render pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOutcome {
    /// First render: local state was seeded.
    pub seeded: bool,
    /// New external data replaced local state.
    pub pulled: bool,
    /// Local state was reported to the parent.
    pub pushed: bool,
}

/// One mounted section: a table engine bridged to the parent form.
///
/// Local edits go through [`SectionSync::dispatch`] and the attachment
/// setters; [`SectionSync::render`] then reconciles with the parent's copy,
/// pulling new external data first and reporting genuine local changes
/// second.
#[derive(Debug)]
pub struct SectionSync {
    name: SectionName,
    template: SectionEntry,
    accepts_attachments: bool,
    engine: TableEngine,
    design_photo_url: Option<String>,
    files: Vec<AttachedFile>,
    detector: ChangeDetector,
}

impl SectionSync {
    pub fn mount(name: SectionName, template: SectionEntry, accepts_attachments: bool) -> Self {
        Self::mount_with_ids(name, template, accepts_attachments, Box::new(UniqueIds::new()))
    }

    pub fn mount_with_ids(
        name: SectionName,
        template: SectionEntry,
        accepts_attachments: bool,
        ids: Box<dyn IdSource>,
    ) -> Self {
        let engine = TableEngine::with_ids(template.table(), ids);
        Self {
            name,
            design_photo_url: template.design_photo_url.clone(),
            files: template.files.clone(),
            template,
            accepts_attachments,
            engine,
            detector: ChangeDetector::new(),
        }
    }

    pub fn name(&self) -> &SectionName {
        &self.name
    }

    pub fn accepts_attachments(&self) -> bool {
        self.accepts_attachments
    }

    pub fn is_seeded(&self) -> bool {
        self.detector.is_ready()
    }

    pub fn table(&self) -> &TableState {
        self.engine.state()
    }

    pub fn design_photo_url(&self) -> Option<&str> {
        self.design_photo_url.as_deref()
    }

    pub fn files(&self) -> &[AttachedFile] {
        &self.files
    }

    /// The local value as the parent would store it.
    pub fn entry(&self) -> SectionEntry {
        let table = self.engine.state();
        SectionEntry {
            columns: table.columns.clone(),
            rows: table.rows.clone(),
            design_photo_url: self.design_photo_url.clone(),
            files: self.files.clone(),
        }
    }

    pub fn dispatch(&mut self, action: TableAction) -> bool {
        self.engine.dispatch(action)
    }

    pub fn set_design_photo_url(&mut self, url: Option<String>) -> bool {
        if !self.accepts_attachments {
            warn!(section = %self.name, "section does not take attachments");
            return false;
        }
        if self.design_photo_url == url {
            return false;
        }
        self.design_photo_url = url;
        true
    }

    pub fn attach_file(&mut self, file: AttachedFile) -> bool {
        if !self.accepts_attachments {
            warn!(section = %self.name, file = %file.name, "section does not take attachments");
            return false;
        }
        self.files.push(file);
        true
    }

    /// Removes every attached file called `name`.
    pub fn detach_file(&mut self, name: &str) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f.name != name);
        self.files.len() != before
    }

    fn load(&mut self, entry: &SectionEntry) {
        self.engine.replace(entry.table());
        self.design_photo_url = entry.design_photo_url.clone();
        self.files = entry.files.clone();
    }

    /// Reconciles with the parent. `external` is the parent's current entry
    /// for this section, `notify` the parent's update callback; it is called
    /// at most once, and only with a value the parent has not seen from us.
    pub fn render(
        &mut self,
        external: Option<&SectionEntry>,
        notify: impl FnOnce(SectionEntry),
    ) -> RenderOutcome {
        let mut outcome = RenderOutcome::default();

        if !self.detector.is_ready() {
            let seed = match external {
                Some(entry) => entry.clone(),
                None => self.template.clone(),
            };
            self.load(&seed);
            self.detector
                .seed(seed.fingerprint(), external.map(|e| e.fingerprint()));
            debug!(section = %self.name, from_parent = external.is_some(), "section seeded");
            outcome.seeded = true;
            return outcome;
        }

        if let Some(external) = external {
            let local = self.entry().fingerprint();
            match self.detector.inbound(external.fingerprint(), local) {
                Inbound::Replace => {
                    debug!(section = %self.name, "external data replaced local state");
                    self.load(external);
                    outcome.pulled = true;
                }
                Inbound::Echo => {
                    debug!(section = %self.name, "parent caught up with local state");
                }
                Inbound::Unchanged => {}
            }
        }

        let local = self.entry();
        if self.detector.outbound(local.fingerprint()) {
            debug!(
                section = %self.name,
                rows = local.rows.len(),
                columns = local.columns.len(),
                "reporting section change to parent"
            );
            notify(local);
            outcome.pushed = true;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::models::{Column, ColumnKind, Row};
    use std::cell::RefCell;

    fn template() -> SectionEntry {
        SectionEntry::from(TableState::new(
            vec![
                Column::new("label", "Parameter", ColumnKind::FixedLabel),
                Column::new("value", "Value", ColumnKind::PlainText),
            ],
            vec![Row::new("r1")
                .with_cell("label", "Joint Design")
                .with_cell("value", "")],
        ))
    }

    fn section(attachments: bool) -> SectionSync {
        SectionSync::mount_with_ids(
            "joints".into(),
            template(),
            attachments,
            Box::new(SequentialIds::new()),
        )
    }

    /// Minimal parent: one stored entry plus a count of notifications.
    #[derive(Default)]
    struct Parent {
        entry: RefCell<Option<SectionEntry>>,
        calls: RefCell<usize>,
    }

    impl Parent {
        fn render(&self, section: &mut SectionSync) -> RenderOutcome {
            let external = self.entry.borrow().clone();
            section.render(external.as_ref(), |entry| {
                *self.calls.borrow_mut() += 1;
                *self.entry.borrow_mut() = Some(entry);
            })
        }
    }

    #[test]
    fn test_mount_without_edits_never_emits() {
        let parent = Parent::default();
        *parent.entry.borrow_mut() = Some(template());
        let mut section = section(false);

        let first = parent.render(&mut section);
        assert!(first.seeded);
        for _ in 0..5 {
            let outcome = parent.render(&mut section);
            assert!(!outcome.pushed && !outcome.pulled);
        }
        assert_eq!(*parent.calls.borrow(), 0);
    }

    #[test]
    fn test_seed_from_template_when_parent_empty() {
        let parent = Parent::default();
        let mut section = section(false);
        parent.render(&mut section);
        parent.render(&mut section);
        assert_eq!(section.entry(), template());
        assert_eq!(*parent.calls.borrow(), 0);
    }

    #[test]
    fn test_local_edit_is_reported_once() {
        let parent = Parent::default();
        *parent.entry.borrow_mut() = Some(template());
        let mut section = section(false);
        parent.render(&mut section);

        assert!(section.dispatch(TableAction::edit_cell("r1", "value", "V-groove")));
        assert!(parent.render(&mut section).pushed);
        // Parent re-renders (sibling changed, own echo): nothing new.
        assert!(!parent.render(&mut section).pushed);
        assert!(!parent.render(&mut section).pulled);

        assert_eq!(*parent.calls.borrow(), 1);
        assert_eq!(parent.entry.borrow().as_ref(), Some(&section.entry()));
    }

    #[test]
    fn test_consecutive_edits_with_one_render_each() {
        let parent = Parent::default();
        *parent.entry.borrow_mut() = Some(template());
        let mut section = section(false);
        parent.render(&mut section);

        section.dispatch(TableAction::edit_cell("r1", "value", "V-groove"));
        assert!(parent.render(&mut section).pushed);

        section.dispatch(TableAction::add_row(None));
        let outcome = parent.render(&mut section);
        assert!(outcome.pushed);
        assert!(!outcome.pulled);

        assert_eq!(section.table().rows.len(), 2);
        assert_eq!(*parent.calls.borrow(), 2);
        let stored = parent.entry.borrow().clone();
        assert_eq!(stored, Some(section.entry()));
    }

    #[test]
    fn test_reloading_original_after_push_replaces_local() {
        let parent = Parent::default();
        *parent.entry.borrow_mut() = Some(template());
        let mut section = section(false);
        parent.render(&mut section);

        section.dispatch(TableAction::edit_cell("r1", "value", "V-groove"));
        assert!(parent.render(&mut section).pushed);

        *parent.entry.borrow_mut() = Some(template());
        let outcome = parent.render(&mut section);
        assert!(outcome.pulled);
        assert!(!outcome.pushed);
        assert_eq!(section.entry(), template());
    }

    #[test]
    fn test_new_external_data_wins_over_local_edits() {
        let parent = Parent::default();
        *parent.entry.borrow_mut() = Some(template());
        let mut section = section(false);
        parent.render(&mut section);

        section.dispatch(TableAction::add_row(None));

        let mut loaded = template();
        loaded.rows[0]
            .cells
            .insert("value".into(), "Double V".into());
        *parent.entry.borrow_mut() = Some(loaded.clone());

        let outcome = parent.render(&mut section);
        assert!(outcome.pulled);
        assert!(!outcome.pushed);
        assert_eq!(section.entry(), loaded);
        assert_eq!(*parent.calls.borrow(), 0);
    }

    #[test]
    fn test_seed_prefers_external_over_template() {
        let parent = Parent::default();
        let mut loaded = template();
        loaded.rows.clear();
        *parent.entry.borrow_mut() = Some(loaded.clone());

        let mut section = section(false);
        parent.render(&mut section);
        assert_eq!(section.entry(), loaded);
    }

    #[test]
    fn test_attachments_flow_up_with_table() {
        let parent = Parent::default();
        *parent.entry.borrow_mut() = Some(template());
        let mut section = section(true);
        parent.render(&mut section);

        assert!(section.set_design_photo_url(Some("https://files.example/joint.png".into())));
        assert!(section.attach_file(AttachedFile::new("sketch.pdf", "application/pdf", 2048)));
        assert!(parent.render(&mut section).pushed);

        let stored = parent.entry.borrow().clone().unwrap();
        assert_eq!(
            stored.design_photo_url.as_deref(),
            Some("https://files.example/joint.png")
        );
        assert_eq!(stored.files.len(), 1);

        assert!(section.detach_file("sketch.pdf"));
        assert!(!section.detach_file("sketch.pdf"));
    }

    #[test]
    fn test_plain_section_refuses_attachments() {
        let mut section = section(false);
        assert!(!section.set_design_photo_url(Some("x".into())));
        assert!(!section.attach_file(AttachedFile::new("a.png", "image/png", 1)));
        assert!(section.files().is_empty());
    }
}
