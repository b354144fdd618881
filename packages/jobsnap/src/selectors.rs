//! Selector chains for the job-posting fields.
//!
//! Each chain is an ordered list of structural hypotheses for one field,
//! newest-observed markup first. The target markup is controlled by a third
//! party and changes without notice; carrying several generations of
//! selectors keeps extraction alive across revisions without a semantic
//! parser. Chains are static configuration, never derived at runtime.

/// An ordered sequence of selector hypotheses for a single field.
///
/// Hypotheses are tried in declared order; the first one whose first matching
/// element carries non-empty text wins. No scoring or merging.
#[derive(Debug, Clone, Copy)]
pub struct SelectorChain {
    /// Field name, used for logging only.
    pub field: &'static str,
    pub hypotheses: &'static [&'static str],
}

pub const TITLE: SelectorChain = SelectorChain {
    field: "title",
    hypotheses: &[
        "h1.top-card-layout__title",
        "h1.t-24",
        "h2.t-24",
        ".job-details-jobs-unified-top-card__job-title h1",
        ".jobs-unified-top-card__job-title",
    ],
};

pub const COMPANY: SelectorChain = SelectorChain {
    field: "company",
    hypotheses: &[
        "a.topcard__org-name-link",
        ".topcard__org-name-link",
        ".job-details-jobs-unified-top-card__company-name a",
        ".jobs-unified-top-card__company-name a",
    ],
};

pub const LOCATION: SelectorChain = SelectorChain {
    field: "location",
    hypotheses: &[
        ".topcard__flavor--bullet",
        ".job-details-jobs-unified-top-card__bullet",
        ".jobs-unified-top-card__bullet",
    ],
};

pub const DESCRIPTION: SelectorChain = SelectorChain {
    field: "description",
    hypotheses: &[
        ".show-more-less-html__markup",
        ".jobs-description__content",
        ".jobs-description-content__text",
        "article.jobs-description",
    ],
};

/// Last-resort containers for the description field.
///
/// Description markup is the least stable of the four fields, so it gets a
/// second, coarser tier: if the whole chain above fails, take the text of the
/// first matching main-content container.
pub const MAIN_CONTENT: SelectorChain = SelectorChain {
    field: "description(main-content)",
    hypotheses: &[".jobs-search__job-details", ".job-view-layout", "main"],
};
