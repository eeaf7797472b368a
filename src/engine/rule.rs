use super::document::{Field, Node};

type Evaluate = Box<dyn Fn(Node<'_>) -> bool + Send + Sync>;
type Detail = Box<dyn Fn(Node<'_>) -> String + Send + Sync>;

/// Placeholder in a rule label that expands to the JSON path of the node
/// the rule is evaluated against, e.g. `orders[2].items[0]`.
pub const AT: &str = "{at}";

/// A single named assertion about a node.
pub struct Rule {
    label: String,
    evaluate: Evaluate,
    detail: Option<Detail>,
    when: Option<Evaluate>,
}

impl Rule {
    pub fn new(
        label: impl Into<String>,
        evaluate: impl Fn(Node<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            evaluate: Box::new(evaluate),
            detail: None,
            when: None,
        }
    }

    /// Rule over one field of the node. Failure detail shows the JSON value
    /// actually found.
    pub fn field(
        label: impl Into<String>,
        name: &'static str,
        predicate: impl Fn(Field<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::new(label, move |node| predicate(node.field(name)))
            .with_detail(move |node| format!("got {}", node.field(name).describe()))
    }

    pub fn with_detail(
        mut self,
        detail: impl Fn(Node<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.detail = Some(Box::new(detail));
        self
    }

    /// Only evaluate the rule for nodes matching `guard`. Inapplicable rules
    /// produce no outcome at all.
    pub fn when(mut self, guard: impl Fn(Node<'_>) -> bool + Send + Sync + 'static) -> Self {
        self.when = Some(Box::new(guard));
        self
    }

    pub fn label_at(&self, path: &str) -> String {
        self.label.replace(AT, path)
    }

    pub fn applies(&self, node: Node<'_>) -> bool {
        self.when.as_ref().map_or(true, |guard| guard(node))
    }

    pub fn evaluate(&self, node: Node<'_>) -> bool {
        (self.evaluate)(node)
    }

    pub fn detail(&self, node: Node<'_>) -> Option<String> {
        self.detail.as_ref().map(|detail| detail(node))
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("label", &self.label).finish_non_exhaustive()
    }
}

/// Which node(s) a group's rules run against, relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The parent node itself.
    Current,
    /// The object stored under a field of the parent. Skipped when missing.
    Field(&'static str),
    /// Every element of the array stored under a field, in index order.
    Each(&'static str),
}

/// Named group of rules with an optional precondition.
///
/// The precondition is evaluated once against the parent node and is
/// recorded like any other rule. When it fails, the group's rules and child
/// groups are skipped for that parent.
#[derive(Debug)]
pub struct RuleGroup {
    pub name: String,
    pub scope: Scope,
    pub precondition: Option<Rule>,
    pub rules: Vec<Rule>,
    pub children: Vec<RuleGroup>,
}

impl RuleGroup {
    pub fn new(name: impl Into<String>, scope: Scope) -> Self {
        Self {
            name: name.into(),
            scope,
            precondition: None,
            rules: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn precondition(mut self, rule: Rule) -> Self {
        self.precondition = Some(rule);
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn child(mut self, group: RuleGroup) -> Self {
        self.children.push(group);
        self
    }
}

/// One schema-conformance contract: a tree of groups rooted at the document.
///
/// The root group's precondition is the fail-fast gate: when it fails the
/// run records that single outcome and nothing else.
#[derive(Debug)]
pub struct RuleSet {
    pub name: String,
    pub root: RuleGroup,
}

impl RuleSet {
    pub fn new(name: impl Into<String>, root: RuleGroup) -> Self {
        Self {
            name: name.into(),
            root,
        }
    }
}
