use std::rc::Rc;
use std::sync::Arc;

use itertools::Itertools;
use xdg_core::constraints;
use xdg_core::constraints::Constraint;
use xdg_core::containers::HashMap;
use xdg_core::containers::IntSet;
use xdg_core::propagators::IntSelection;
use xdg_core::propagators::IvMemberSv;
use xdg_core::propagators::SimplePrecedenceSelection;
use xdg_core::propagators::UnionSelection;
use xdg_core::variables::IntVar;
use xdg_core::variables::SetVar;
use xdg_core::Model;
use xdg_grammar::format::Cardinality;
use xdg_grammar::Attributes;
use xdg_grammar::DimensionRef;
use xdg_grammar::FeatureId;
use xdg_grammar::GrammarError;
use xdg_grammar::Label;
use xdg_grammar::LabelSet;
use xdg_grammar::Language;
use xdg_grammar::LexEntry;
use xdg_grammar::PrincipleKind;

use crate::problem::sentence::DimId;
use crate::problem::sentence::ProblemDimension;
use crate::problem::sentence::Sentence;
use crate::problem::sentence::DELETION_LABEL;
use crate::problem::variables::Agreement;
use crate::problem::variables::ArcVariables;
use crate::problem::variables::Variables;
use crate::ProblemError;
use crate::ProblemOptions;

pub(crate) struct CompilationContext<'a, 'g> {
    /// The model the problem is compiled into.
    pub(crate) model: Model,
    pub(crate) sentence: &'a Sentence<'g>,
    /// The variables shared between principles; most are created on first use.
    pub(crate) variables: Variables,

    /// The arcs fixed before search, by dimension and label.
    pre_arcs: HashMap<(DimId, Label), Vec<(usize, usize)>>,
    /// The agreement values fixed before search, by dimension, node and feature.
    pre_agrs: HashMap<(DimId, usize, FeatureId), u32>,
    /// The weight of the constraints of a principle kind; 1 when absent.
    weights: HashMap<PrincipleKind, f64>,

    /// The principle the propagators posted next are attributed to.
    principle: Rc<str>,
    principle_kind: Option<PrincipleKind>,
}

impl std::fmt::Debug for CompilationContext<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompilationContext")
            .field("principle", &self.principle)
            .field("num_propagators", &self.model.num_propagators())
            .finish_non_exhaustive()
    }
}

impl<'a, 'g> CompilationContext<'a, 'g> {
    pub(crate) fn new(
        sentence: &'a Sentence<'g>,
        options: &ProblemOptions,
    ) -> Result<CompilationContext<'a, 'g>, ProblemError> {
        let mut context = CompilationContext {
            model: Model::default(),
            sentence,
            variables: Variables::default(),
            pre_arcs: HashMap::default(),
            pre_agrs: HashMap::default(),
            weights: HashMap::default(),
            principle: Rc::from("lexical selection"),
            principle_kind: None,
        };
        context.resolve_options(options)?;
        Ok(context)
    }

    fn resolve_options(&mut self, options: &ProblemOptions) -> Result<(), ProblemError> {
        let source = self.sentence.languages[0].abbrev();

        for (dimension, labels) in &options.pre_arcs {
            let dim = self.resolve_dimension(dimension, source)?;
            let label_set = self.label_set(dim)?;
            for (label, arcs) in labels {
                let label = label_set
                    .get(label)
                    .ok_or_else(|| GrammarError::UnknownLabel {
                        dimension: dimension.clone(),
                        label: label.clone(),
                    })?;
                for &(mother, daughter) in arcs {
                    let _ = self.check_node(mother)?;
                    let _ = self.check_node(daughter)?;
                }
                let _ = self.pre_arcs.insert((dim, label), arcs.clone());
            }
        }

        for (dimension, features) in &options.pre_agrs {
            let dim = self.resolve_dimension(dimension, source)?;
            let language = self.language(dim);
            for (feature, values) in features {
                let id = language
                    .feature_id(feature)
                    .ok_or_else(|| GrammarError::UnknownFeature {
                        language: language.abbrev().to_owned(),
                        feature: feature.clone(),
                    })?;
                for (node, value) in values {
                    let node = self.check_node(*node)?;
                    let code = language.feature(id).code(value).ok_or_else(|| {
                        GrammarError::UnknownFeatureValue {
                            feature: feature.clone(),
                            value: value.clone(),
                        }
                    })?;
                    let _ = self.pre_agrs.insert((dim, node, id), code);
                }
            }
        }

        for (principle, &weight) in &options.weights {
            let kind = principle.parse::<PrincipleKind>()?;
            let _ = self.weights.insert(kind, weight);
        }
        Ok(())
    }

    fn resolve_dimension(&self, text: &str, language: &str) -> Result<DimId, ProblemError> {
        let reference = DimensionRef::parse(text, language);
        self.sentence.dimension(&reference).ok_or_else(|| {
            GrammarError::UnknownDimension {
                language: reference.language,
                dimension: reference.dimension,
            }
            .into()
        })
    }

    fn label_set(&self, dim: DimId) -> Result<&'a LabelSet, ProblemError> {
        let dimension = &self.sentence.dimensions[dim];
        dimension.labels().ok_or_else(|| {
            GrammarError::UnknownDimension {
                language: dimension.reference.language.clone(),
                dimension: dimension.reference.dimension.clone(),
            }
            .into()
        })
    }

    fn check_node(&self, node: usize) -> Result<usize, ProblemError> {
        if node < self.num_nodes() {
            Ok(node)
        } else {
            Err(ProblemError::InvalidNode {
                node,
                num_nodes: self.num_nodes(),
            })
        }
    }

    /// Attribute the propagators posted from now on to principle `kind` of dimension `dim`.
    pub(crate) fn begin_principle(&mut self, kind: PrincipleKind, dim: DimId) {
        self.principle = format!("{}:{kind}", self.sentence.dimensions[dim].reference).into();
        self.principle_kind = Some(kind);
    }

    pub(crate) fn principle(&self) -> &str {
        &self.principle
    }

    pub(crate) fn post(&mut self, constraint: impl Constraint) -> Result<(), ProblemError> {
        let weight = self
            .principle_kind
            .and_then(|kind| self.weights.get(&kind).copied())
            .unwrap_or(1.0);
        self.model
            .add_constraint(constraint)
            .weight(weight)
            .principle(Rc::clone(&self.principle))
            .post()
            .map_err(|source| ProblemError::Constraint {
                principle: self.principle.to_string(),
                source,
            })
    }

    pub(crate) fn num_nodes(&self) -> usize {
        self.sentence.nodes.len()
    }

    pub(crate) fn eos(&self) -> usize {
        self.sentence.eos()
    }

    pub(crate) fn all_nodes(&self) -> IntSet {
        self.sentence.all_nodes()
    }

    pub(crate) fn dimension(&self, dim: DimId) -> &'a ProblemDimension<'g> {
        &self.sentence.dimensions[dim]
    }

    pub(crate) fn language(&self, dim: DimId) -> &'g Language {
        self.sentence.languages[self.sentence.dimensions[dim].language]
    }

    /// The labels of arc dimension `dim`; empty for interface dimensions.
    pub(crate) fn labels(&self, dim: DimId) -> Vec<Label> {
        self.dimension(dim)
            .labels()
            .map(|labels| labels.iter().collect())
            .unwrap_or_default()
    }

    pub(crate) fn label(&self, dim: DimId, name: &str) -> Option<Label> {
        self.dimension(dim).labels().and_then(|labels| labels.get(name))
    }

    pub(crate) fn entries(&self, dim: DimId, node: usize) -> &'a [Arc<LexEntry>] {
        self.sentence
            .entries(self.sentence.dimensions[dim].language, node)
    }

    /// The attributes in dimension `dim` of every entry of `node`, in entry order.
    pub(crate) fn attributes(&self, dim: DimId, node: usize) -> Vec<&'a Attributes> {
        let abbrev = &self.dimension(dim).dimension.abbrev;
        self.entries(dim, node)
            .iter()
            .map(|entry| entry.attributes(abbrev))
            .collect()
    }

    /// The entry node `node` selects in `language`.
    pub(crate) fn lexvar(&mut self, language: usize, node: usize) -> IntVar {
        if self.variables.lexvars.is_empty() {
            self.variables.lexvars = vec![Vec::new(); self.sentence.languages.len()];
        }
        if self.variables.lexvars[language].is_empty() {
            let abbrev = self.sentence.languages[language].abbrev();
            self.variables.lexvars[language] = (0..self.num_nodes())
                .map(|v| {
                    let num_entries = self.sentence.entries(language, v).len() as u32;
                    let var = self
                        .model
                        .new_int_var(format!("{abbrev}:lex[{v}]"), IntSet::range(0, num_entries));
                    self.model.make_core(var);
                    var
                })
                .collect();
        }
        self.variables.lexvars[language][node]
    }

    /// A set variable equal to `sets[e]` when `node` selects entry `e` in `language`.
    ///
    /// When all entries agree the set is a constant.
    pub(crate) fn select_by_entry(
        &mut self,
        language: usize,
        node: usize,
        name: impl Into<String>,
        sets: Vec<IntSet>,
    ) -> Result<SetVar, ProblemError> {
        if sets.iter().all_equal() {
            let value = sets.into_iter().next().unwrap_or_default();
            return Ok(self.model.set_constant(value));
        }

        let lower = sets
            .iter()
            .skip(1)
            .fold(sets[0].clone(), |lower, set| lower.intersection(set));
        let upper = sets.iter().fold(IntSet::new(), |upper, set| upper.union(set));
        let lcard = sets.iter().map(IntSet::len).min().unwrap_or(0) as u32;
        let ucard = sets.iter().map(IntSet::len).max().unwrap_or(0) as u32;
        let selected = self
            .model
            .new_set_var_with_cardinality(name, lower, upper, lcard, ucard);

        let lexvar = self.lexvar(language, node);
        let seqs = sets
            .into_iter()
            .map(|set| self.model.set_constant(set))
            .collect();
        self.post(IntSelection::new(selected, lexvar, seqs))?;
        Ok(selected)
    }

    /// The graph variables of arc dimension `dim`, created on first use.
    pub(crate) fn arcs(&mut self, dim: DimId) -> ArcVariables {
        if let Some(arcs) = self.variables.arcs.get(&dim) {
            return arcs.clone();
        }
        let arcs = self.create_arcs(dim);
        let _ = self.variables.arcs.insert(dim, arcs.clone());
        arcs
    }

    fn create_arcs(&mut self, dim: DimId) -> ArcVariables {
        let dimension = self.dimension(dim);
        let name = dimension.reference.to_string();
        let prune = dimension.dimension.has_principle(PrincipleKind::Valency);
        let labels = self.labels(dim);
        let n = self.num_nodes();
        let eos = self.eos();
        let all = self.all_nodes();
        let not_eos = all.difference(&IntSet::singleton(eos as u32));

        let mut outs = Vec::with_capacity(n);
        let mut ins = Vec::with_capacity(n);
        for v in 0..n {
            let attributes = self.attributes(dim, v);
            let own = IntSet::singleton(v as u32);

            let mut node_outs = Vec::with_capacity(labels.len());
            let mut node_ins = Vec::with_capacity(labels.len());
            for &label in &labels {
                let label_name = self.label_name(dim, label);

                let (out_lower, out_upper, in_lower, in_upper) = match self.pre_arcs.get(&(dim, label)) {
                    Some(arcs) => {
                        let daughters = node_set(arcs.iter().filter(|arc| arc.0 == v).map(|arc| arc.1));
                        let mothers = node_set(arcs.iter().filter(|arc| arc.1 == v).map(|arc| arc.0));
                        (daughters.clone(), daughters, mothers.clone(), mothers)
                    }
                    None => {
                        let admits_outs = attributes
                            .iter()
                            .any(|attributes| admits(attributes.outs.get(&label), n));
                        let admits_ins = attributes
                            .iter()
                            .any(|attributes| admits(attributes.ins.get(&label), n));
                        let out_upper = if prune && !admits_outs {
                            IntSet::new()
                        } else {
                            not_eos.difference(&own)
                        };
                        let in_upper = if v == eos || (prune && !admits_ins) {
                            IntSet::new()
                        } else {
                            all.difference(&own)
                        };
                        (IntSet::new(), out_upper, IntSet::new(), in_upper)
                    }
                };

                let out = self.model.new_set_var(
                    format!("{name}:outs[{v}][{label_name}]"),
                    out_lower,
                    out_upper,
                );
                self.model.make_core(out);
                node_outs.push(out);
                node_ins.push(self.model.new_set_var(
                    format!("{name}:ins[{v}][{label_name}]"),
                    in_lower,
                    in_upper,
                ));
            }
            outs.push(node_outs);
            ins.push(node_ins);
        }

        let own = |v: usize| IntSet::singleton(v as u32);
        let below = |v: usize| not_eos.difference(&own(v));
        let above = |v: usize| {
            if v == eos {
                IntSet::new()
            } else {
                all.difference(&own(v))
            }
        };
        let mut node_vars = |kind: &str, lower: &dyn Fn(usize) -> IntSet, upper: &dyn Fn(usize) -> IntSet| {
            (0..n)
                .map(|v| {
                    self.model
                        .new_set_var(format!("{name}:{kind}[{v}]"), lower(v), upper(v))
                })
                .collect::<Vec<_>>()
        };

        let daughters = node_vars("daughters", &|_| IntSet::new(), &below);
        let mothers = node_vars("mothers", &|_| IntSet::new(), &above);
        let down = node_vars("down", &|_| IntSet::new(), &below);
        let eqdown = node_vars("eqdown", &own, &|v| below(v).union(&own(v)));
        let up = node_vars("up", &|_| IntSet::new(), &above);
        let equp = node_vars("equp", &own, &|v| above(v).union(&own(v)));

        ArcVariables {
            outs,
            ins,
            daughters,
            mothers,
            down,
            eqdown,
            up,
            equp,
        }
    }

    pub(crate) fn label_name(&self, dim: DimId, label: Label) -> &'a str {
        self.dimension(dim)
            .labels()
            .map_or("?", |labels| labels.name(label))
    }

    /// The surface positions of the nodes in arc dimension `dim`, each a singleton set.
    ///
    /// Nodes of a parsed dimension sit at their own index. In a generated dimension the positions
    /// are variables: pairwise distinct, the end-of-sentence node last, and deleted nodes in index
    /// order.
    pub(crate) fn positions(&mut self, dim: DimId) -> Result<Vec<SetVar>, ProblemError> {
        if let Some(positions) = self.variables.positions.get(&dim) {
            return Ok(positions.clone());
        }

        let n = self.num_nodes();
        let eos = self.eos();
        let positions: Vec<SetVar> = if self.dimension(dim).is_output() {
            let name = self.dimension(dim).reference.to_string();
            let range = IntSet::range(0, eos as u32);
            let mut positions = Vec::with_capacity(n);
            for v in 0..eos {
                let position = self.model.new_set_var_with_cardinality(
                    format!("{name}:pos[{v}]"),
                    IntSet::new(),
                    range.clone(),
                    1,
                    1,
                );
                self.model.make_core(position);
                positions.push(position);
            }
            positions.push(self.model.set_constant(IntSet::singleton(eos as u32)));

            self.post(constraints::disjoint(positions.iter().copied()))?;
            if let Some(deletion) = self.label(dim, DELETION_LABEL) {
                let deleted = self.arcs(dim).outs[eos][deletion as usize];
                self.post(SimplePrecedenceSelection::new(deleted, positions.clone()))?;
            }
            positions
        } else {
            (0..n)
                .map(|v| self.model.set_constant(IntSet::singleton(v as u32)))
                .collect()
        };

        let _ = self.variables.positions.insert(dim, positions.clone());
        Ok(positions)
    }

    /// The agreement value of `node` for `feature` in arc dimension `dim`, created on first use.
    ///
    /// Its domain are the values the entries of the node admit; entries without a value for the
    /// feature admit all of them.
    pub(crate) fn agreement(
        &mut self,
        dim: DimId,
        node: usize,
        feature: FeatureId,
    ) -> Result<Agreement, ProblemError> {
        if let Some(&agreement) = self.variables.agreement.get(&(dim, node, feature)) {
            return Ok(agreement);
        }

        let dimension = self.dimension(dim);
        let feature_name = self.language(dim).feature(feature).name();
        let num_values = self.language(dim).feature(feature).num_values();
        let all_values = IntSet::range(0, num_values);
        let name = format!("{}:agr[{node}][{feature_name}]", dimension.reference);

        let mut sets: Vec<IntSet> = self
            .attributes(dim, node)
            .into_iter()
            .map(|attributes| {
                attributes
                    .agrs
                    .get(&feature)
                    .cloned()
                    .unwrap_or_else(|| all_values.clone())
            })
            .collect();
        if let Some(&fixed) = self.pre_agrs.get(&(dim, node, feature)) {
            let fixed = IntSet::singleton(fixed);
            sets.iter_mut().for_each(|set| set.intersect_with(&fixed));
        }
        let domain = sets.iter().fold(IntSet::new(), |domain, set| domain.union(set));

        let value = self.model.new_int_var(name.clone(), domain.clone());
        if dimension.is_output() {
            self.model.make_core(value);
        }
        if !sets.iter().all_equal() {
            let language = dimension.language;
            let admitted = self.select_by_entry(language, node, format!("{name}:admitted"), sets)?;
            self.post(IvMemberSv::new(value, admitted))?;
        }

        let set = self.model.new_set_var_with_cardinality(
            format!("{name}:set"),
            IntSet::new(),
            domain,
            1,
            1,
        );
        let singletons = (0..num_values)
            .map(|code| self.model.set_constant(IntSet::singleton(code)))
            .collect();
        self.post(IntSelection::new(set, value, singletons))?;

        let agreement = Agreement { value, set };
        let _ = self
            .variables
            .agreement
            .insert((dim, node, feature), agreement);
        Ok(agreement)
    }

    /// The agreement values on `feature` of arc dimension `feature_dim` carried by the nodes in
    /// `nodes`.
    pub(crate) fn values_of(
        &mut self,
        name: impl Into<String>,
        nodes: SetVar,
        feature_dim: DimId,
        feature: FeatureId,
    ) -> Result<SetVar, ProblemError> {
        let sets = (0..self.num_nodes())
            .map(|u| Ok(self.agreement(feature_dim, u, feature)?.set))
            .collect::<Result<Vec<_>, ProblemError>>()?;
        let upper = IntSet::range(0, self.language(feature_dim).feature(feature).num_values());

        let values = self.model.new_set_var(name, IntSet::new(), upper);
        self.post(UnionSelection::new(values, nodes, sets))?;
        Ok(values)
    }

    /// Consume the context, leaving the compiled model and its variables.
    pub(crate) fn finish(self) -> (Model, Variables) {
        (self.model, self.variables)
    }
}

/// Whether an entry with `cardinality` on a label can have any arc with it.
fn admits(cardinality: Option<&Cardinality>, num_nodes: usize) -> bool {
    cardinality.is_some_and(|cardinality| cardinality.capped(num_nodes as u32).1 > 0)
}

fn node_set(nodes: impl IntoIterator<Item = usize>) -> IntSet {
    nodes.into_iter().map(|node| node as u32).collect()
}
