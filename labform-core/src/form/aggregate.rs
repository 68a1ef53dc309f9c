use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, info};

use super::layout::{FormLayout, SectionTemplate};
use super::record::{Aggregate, Record};
use super::FormError;
use crate::client::{Receipt, SubmitError, Submitter};
use crate::models::{SectionEntry, SectionName};
use crate::sync::SectionSync;

/// Update callback handed to one section. Writes the section's reported
/// value into the shared aggregate under its name.
#[derive(Debug)]
pub struct SectionUpdater {
    name: SectionName,
    aggregate: Rc<RefCell<Aggregate>>,
}

impl SectionUpdater {
    pub fn name(&self) -> &SectionName {
        &self.name
    }

    pub fn update(&self, entry: SectionEntry) {
        self.aggregate.borrow_mut().insert(self.name.clone(), entry);
    }
}

/// A record form made of several section tables sharing one aggregate.
#[derive(Debug)]
pub struct MultiSectionForm {
    layout: FormLayout,
    variant: String,
    record_id: Option<String>,
    prepared_by: Option<String>,
    aggregate: Rc<RefCell<Aggregate>>,
    sections: Vec<SectionSync>,
    updaters: HashMap<SectionName, Rc<SectionUpdater>>,
    generation: u64,
}

fn seed_aggregate(templates: &[SectionTemplate], saved: Option<&Aggregate>) -> Aggregate {
    let mut aggregate: Aggregate = templates
        .iter()
        .map(|t| (t.name.clone(), t.entry()))
        .collect();
    if let Some(saved) = saved {
        for (name, entry) in saved {
            aggregate.insert(name.clone(), entry.clone());
        }
    }
    aggregate
}

fn mount_sections(templates: &[SectionTemplate]) -> Vec<SectionSync> {
    templates
        .iter()
        .map(|t| SectionSync::mount(t.name.clone(), t.entry(), t.attachments))
        .collect()
}

fn memoized_updater(
    updaters: &mut HashMap<SectionName, Rc<SectionUpdater>>,
    aggregate: &Rc<RefCell<Aggregate>>,
    name: &SectionName,
) -> Rc<SectionUpdater> {
    updaters
        .entry(name.clone())
        .or_insert_with(|| {
            Rc::new(SectionUpdater {
                name: name.clone(),
                aggregate: Rc::clone(aggregate),
            })
        })
        .clone()
}

impl MultiSectionForm {
    /// Opens a form. With a saved `record` the aggregate starts from its
    /// sections (edit mode); otherwise from the variant's templates. The
    /// variant is `variant`, else the record's, else the layout default.
    pub fn new(
        layout: FormLayout,
        variant: Option<&str>,
        record: Option<Record>,
    ) -> Result<Self, FormError> {
        layout.validate()?;
        let variant = variant
            .map(str::to_string)
            .or_else(|| record.as_ref().map(|r| r.variant.clone()))
            .unwrap_or_else(|| layout.default_variant().to_string());
        let templates = layout
            .sections(&variant)
            .ok_or_else(|| FormError::UnknownVariant(variant.clone()))?;

        let aggregate = seed_aggregate(templates, record.as_ref().map(|r| &r.sections));
        let sections = mount_sections(templates);
        debug!(
            form = %layout.name,
            %variant,
            sections = sections.len(),
            editing = record.is_some(),
            "form opened"
        );

        let (record_id, prepared_by) = match record {
            Some(r) => (r.id, r.prepared_by),
            None => (None, None),
        };
        Ok(Self {
            layout,
            variant,
            record_id,
            prepared_by,
            aggregate: Rc::new(RefCell::new(aggregate)),
            sections,
            updaters: HashMap::new(),
            generation: 0,
        })
    }

    pub fn layout(&self) -> &FormLayout {
        &self.layout
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn prepared_by(&self) -> Option<&str> {
        self.prepared_by.as_deref()
    }

    pub fn set_prepared_by(&mut self, prepared_by: impl Into<String>) {
        self.prepared_by = Some(prepared_by.into());
    }

    /// Bumped every time the sections are remounted.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn sections(&self) -> &[SectionSync] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&SectionSync> {
        self.sections.iter().find(|s| s.name().as_str() == name)
    }

    pub fn section_mut(&mut self, name: &str) -> Result<&mut SectionSync, FormError> {
        self.sections
            .iter_mut()
            .find(|s| s.name().as_str() == name)
            .ok_or_else(|| FormError::UnknownSection(name.to_string()))
    }

    /// Title of a mounted section from the current variant's templates.
    pub fn section_title(&self, name: &str) -> Option<&str> {
        self.layout
            .sections(&self.variant)?
            .iter()
            .find(|t| t.name.as_str() == name)
            .map(SectionTemplate::display_title)
    }

    /// Snapshot of the shared aggregate.
    pub fn aggregate(&self) -> Aggregate {
        self.aggregate.borrow().clone()
    }

    /// The update callback for `name`. The same `Rc` is returned for the
    /// lifetime of the current mount.
    pub fn updater(&mut self, name: &SectionName) -> Rc<SectionUpdater> {
        memoized_updater(&mut self.updaters, &self.aggregate, name)
    }

    /// Renders every section against the aggregate. Returns the number of
    /// sections that reported a change upward.
    pub fn render(&mut self) -> usize {
        let mut pushed = 0;
        for section in &mut self.sections {
            let external = self.aggregate.borrow().get(section.name()).cloned();
            let updater = memoized_updater(&mut self.updaters, &self.aggregate, section.name());
            let outcome = section.render(external.as_ref(), |entry| updater.update(entry));
            if outcome.pushed {
                pushed += 1;
            }
        }
        if pushed > 0 {
            debug!(sections = pushed, "aggregate updated");
        }
        pushed
    }

    /// Switches the template variant. The aggregate is re-seeded from the
    /// new templates and every section is remounted. Returns false if the
    /// variant is already active.
    pub fn set_variant(&mut self, variant: &str) -> Result<bool, FormError> {
        if variant == self.variant {
            return Ok(false);
        }
        let templates = self
            .layout
            .sections(variant)
            .ok_or_else(|| FormError::UnknownVariant(variant.to_string()))?;

        self.aggregate = Rc::new(RefCell::new(seed_aggregate(templates, None)));
        self.sections = mount_sections(templates);
        self.updaters.clear();
        self.generation += 1;
        info!(
            from = %self.variant,
            to = variant,
            generation = self.generation,
            "template variant switched"
        );
        self.variant = variant.to_string();
        Ok(true)
    }

    /// Loads a saved record into the open form. Sections pick the new data
    /// up on the next render, overriding local edits.
    pub fn load(&mut self, record: Record) -> Result<(), FormError> {
        if record.variant != self.variant {
            self.set_variant(&record.variant)?;
        }
        let templates = self
            .layout
            .sections(&self.variant)
            .ok_or_else(|| FormError::UnknownVariant(self.variant.clone()))?;
        *self.aggregate.borrow_mut() = seed_aggregate(templates, Some(&record.sections));
        self.record_id = record.id;
        self.prepared_by = record.prepared_by;
        Ok(())
    }

    /// The record as it would be submitted now.
    pub fn payload(&self) -> Record {
        Record {
            id: self.record_id.clone(),
            form_name: self.layout.name.clone(),
            variant: self.variant.clone(),
            prepared_by: self.prepared_by.clone(),
            sections: self.aggregate(),
        }
    }

    pub fn has_data(&self) -> bool {
        self.aggregate.borrow().values().any(SectionEntry::has_data)
    }

    /// Flushes pending section changes, checks that something was entered
    /// and hands the payload to `submitter`.
    pub async fn submit<S: Submitter>(&mut self, submitter: &S) -> Result<Receipt, SubmitError> {
        self.render();
        let payload = self.payload();
        if !payload.has_data() {
            return Err(SubmitError::Incomplete);
        }
        let receipt = submitter.submit(&payload).await?;
        self.record_id = Some(receipt.id.clone());
        Ok(receipt)
    }
}
