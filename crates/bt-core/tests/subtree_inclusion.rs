use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bt_core::builder::{action, condition, include, lazy_include, selector, sequence};
use bt_core::{
    BehaviorTree, Include, LibraryConfig, Result, Status, SubtreeLibrary, SubtreeResolver, Task,
    TaskCore, TaskError, TaskMetadata, walk,
};

/// Blackboard recording what the tree did this run.
type Log = Vec<u32>;

static TALLY_METADATA: TaskMetadata = TaskMetadata::leaf(&["ticks"]);

/// Leaf with per-instance mutable state: counts its own ticks.
struct Tally {
    core: TaskCore,
    ticks: u32,
}

impl Tally {
    fn boxed() -> Box<dyn Task<Log>> {
        Box::new(Self {
            core: TaskCore::new(),
            ticks: 0,
        })
    }
}

impl Task<Log> for Tally {
    fn name(&self) -> &'static str {
        "Tally"
    }

    fn metadata(&self) -> &'static TaskMetadata {
        &TALLY_METADATA
    }

    fn core(&self) -> &TaskCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TaskCore {
        &mut self.core
    }

    fn children(&self) -> &[Box<dyn Task<Log>>] {
        &[]
    }

    fn add_child(&mut self, _child: Box<dyn Task<Log>>) -> Result<()> {
        Err(TaskError::TooManyChildren {
            task: "Tally",
            max: 0,
        })
    }

    fn copy_fields(&self) -> Result<Box<dyn Task<Log>>> {
        Ok(Box::new(Self {
            core: TaskCore::new(),
            ticks: self.ticks,
        }))
    }

    fn tick(&mut self, ctx: &mut Log, _resolver: &dyn SubtreeResolver<Log>) -> Result<Status> {
        self.ticks += 1;
        ctx.push(self.ticks);
        Ok(Status::Success)
    }
}

/// Library wrapper counting top-level resolver calls.
struct Counting {
    library: SubtreeLibrary<Log>,
    calls: AtomicUsize,
}

impl Counting {
    fn new() -> Arc<Self> {
        let mut library = SubtreeLibrary::new();
        library.register("enemy_spotted", sequence(vec![Tally::boxed()]));
        Arc::new(Self {
            library,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SubtreeResolver<Log> for Counting {
    fn create_root_task(&self, reference: &str) -> Result<Box<dyn Task<Log>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.library.create_root_task(reference)
    }
}

fn names(root: &dyn Task<Log>) -> Vec<&'static str> {
    let mut names = Vec::new();
    walk(root, &mut |task, _| names.push(task.name()));
    names
}

#[test]
fn eager_include_is_replaced_on_every_clone() {
    let resolver = Counting::new();
    let template: Box<dyn Task<Log>> = selector(vec![
        condition(|log: &Log| log.len() > 10),
        include("enemy_spotted"),
    ]);

    let first = BehaviorTree::instantiate(template.as_ref(), resolver.clone()).unwrap();
    let second = BehaviorTree::instantiate(template.as_ref(), resolver.clone()).unwrap();

    assert!(!names(first.root()).contains(&"Include"));
    assert_eq!(
        names(first.root()),
        vec!["Selector", "Condition", "Sequence", "Tally"]
    );
    assert_ne!(
        first.root().children()[1].id(),
        second.root().children()[1].id()
    );
    assert_eq!(resolver.calls(), 2);
}

#[test]
fn eager_grafted_tree_runs() {
    let resolver = Counting::new();
    let template: Box<dyn Task<Log>> = sequence(vec![include("enemy_spotted")]);

    let mut tree = BehaviorTree::instantiate(template.as_ref(), resolver).unwrap();
    let mut log = Log::new();
    assert_eq!(tree.step(&mut log).unwrap(), Status::Success);
    assert_eq!(log, vec![1]);
}

#[test]
fn lazy_include_resolves_on_first_step_only() {
    let resolver = Counting::new();
    let template: Box<dyn Task<Log>> =
        sequence(vec![Box::new(Include::with_mode("enemy_spotted", true))]);

    let mut tree = BehaviorTree::instantiate(template.as_ref(), resolver.clone()).unwrap();
    let include = &tree.root().children()[0];
    assert_eq!(include.name(), "Include");
    assert_eq!(include.child_count(), 0);
    assert_eq!(resolver.calls(), 0);

    let mut log = Log::new();
    tree.step(&mut log).unwrap();
    assert_eq!(resolver.calls(), 1);
    assert_eq!(tree.root().children()[0].child_count(), 1);

    tree.step(&mut log).unwrap();
    assert_eq!(resolver.calls(), 1);
    assert_eq!(log, vec![1, 2]);
}

#[test]
fn lazy_include_in_untaken_branch_never_resolves() {
    let resolver = Counting::new();
    let template: Box<dyn Task<Log>> = selector(vec![
        action(|_: &mut Log| Status::Success),
        lazy_include("enemy_spotted"),
    ]);

    let mut tree = BehaviorTree::instantiate(template.as_ref(), resolver.clone()).unwrap();
    tree.step(&mut Log::new()).unwrap();

    assert_eq!(resolver.calls(), 0);
    assert_eq!(tree.root().children()[1].child_count(), 0);
}

#[test]
fn clones_resolve_independent_lazy_subtrees() {
    let resolver = Counting::new();
    let template: Box<dyn Task<Log>> = sequence(vec![lazy_include("enemy_spotted")]);

    let mut scout = BehaviorTree::instantiate(template.as_ref(), resolver.clone()).unwrap();
    let mut guard = BehaviorTree::instantiate(template.as_ref(), resolver.clone()).unwrap();

    let mut scout_log = Log::new();
    let mut guard_log = Log::new();
    for _ in 0..3 {
        scout.step(&mut scout_log).unwrap();
    }
    guard.step(&mut guard_log).unwrap();

    assert_eq!(scout_log, vec![1, 2, 3]);
    assert_eq!(guard_log, vec![1]);
    assert_eq!(resolver.calls(), 2);

    let scout_subtree = scout.root().children()[0].children()[0].id();
    let guard_subtree = guard.root().children()[0].children()[0].id();
    assert_ne!(scout_subtree, guard_subtree);
}

#[test]
fn cloning_a_running_tree_starts_lazy_includes_fresh() {
    let resolver = Counting::new();
    let template: Box<dyn Task<Log>> = sequence(vec![lazy_include("enemy_spotted")]);

    let mut original = BehaviorTree::instantiate(template.as_ref(), resolver.clone()).unwrap();
    original.step(&mut Log::new()).unwrap();

    let mut copy = original.try_clone().unwrap();
    assert_eq!(copy.root().children()[0].child_count(), 0);

    let mut log = Log::new();
    copy.step(&mut log).unwrap();
    assert_eq!(log, vec![1]);
    assert_eq!(resolver.calls(), 2);
}

#[test]
fn clones_can_run_on_separate_threads() {
    let resolver = Counting::new();
    let template: Box<dyn Task<Log>> = sequence(vec![lazy_include("enemy_spotted")]);

    let trees: Vec<_> = (0..4)
        .map(|_| BehaviorTree::instantiate(template.as_ref(), resolver.clone()).unwrap())
        .collect();

    let logs: Vec<Log> = std::thread::scope(|scope| {
        let handles: Vec<_> = trees
            .into_iter()
            .map(|mut tree| {
                scope.spawn(move || {
                    let mut log = Log::new();
                    tree.step(&mut log).unwrap();
                    tree.step(&mut log).unwrap();
                    log
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(logs.iter().all(|log| log == &vec![1, 2]));
    assert_eq!(resolver.calls(), 4);
}

#[test]
fn eager_include_without_reference_is_unresolved() {
    let resolver = Counting::new();
    let template: Box<dyn Task<Log>> = sequence(vec![Box::new(Include::new())]);

    let err = BehaviorTree::instantiate(template.as_ref(), resolver.clone())
        .err()
        .unwrap();
    assert_eq!(
        err,
        TaskError::UnresolvedReference {
            reference: String::new()
        }
    );
    assert_eq!(resolver.calls(), 0);
}

#[test]
fn lazy_include_with_unknown_reference_fails_on_step() {
    let resolver = Counting::new();
    let template: Box<dyn Task<Log>> = sequence(vec![lazy_include("ambush")]);

    let mut tree = BehaviorTree::instantiate(template.as_ref(), resolver).unwrap();
    let err = tree.step(&mut Log::new()).unwrap_err();
    assert_eq!(
        err,
        TaskError::UnresolvedReference {
            reference: "ambush".to_string()
        }
    );
}

#[test]
fn eager_include_in_uncloned_tree_cannot_run() {
    let resolver = Counting::new();
    let mut tree =
        BehaviorTree::<Log>::new(sequence(vec![include("enemy_spotted")]), resolver.clone());

    let err = tree.step(&mut Log::new()).unwrap_err();
    assert!(matches!(
        err,
        TaskError::InvalidOperation {
            task: "Include",
            ..
        }
    ));
    assert_eq!(resolver.calls(), 0);
}

#[test]
fn eager_include_rejects_attach_and_copy_every_time() {
    let resolver = Counting::new();
    let mut eager = Include::<Log>::with_subtree("enemy_spotted");
    let parent = TaskCore::new();

    for _ in 0..2 {
        let err = eager.set_control(parent.id(), resolver.as_ref()).unwrap_err();
        assert!(matches!(err, TaskError::InvalidOperation { .. }));
        let err = eager.copy_fields().err().unwrap();
        assert!(matches!(err, TaskError::CloneError { .. }));
    }
    assert_eq!(resolver.calls(), 0);
}

#[test]
fn eager_include_never_gains_a_parent() {
    let resolver = Counting::new();
    let parent = TaskCore::new();

    let mut direct = Include::<Log>::with_subtree("enemy_spotted");
    assert!(direct.set_control(parent.id(), resolver.as_ref()).is_err());
    assert_eq!(direct.control(), None);

    let eager: Box<dyn Task<Log>> = Box::new(Include::with_subtree("enemy_spotted"));
    let mut as_root = BehaviorTree::<Log>::new(eager, resolver.clone());
    assert!(as_root.step(&mut Log::new()).is_err());
    assert_eq!(as_root.root().control(), None);

    let mut as_child =
        BehaviorTree::<Log>::new(sequence(vec![include("enemy_spotted")]), resolver.clone());
    assert!(as_child.step(&mut Log::new()).is_err());
    assert_eq!(as_child.root().children()[0].control(), None);

    assert_eq!(resolver.calls(), 0);
}

#[test]
fn lazy_self_reference_in_library_is_bounded() {
    let mut library = SubtreeLibrary::with_config(LibraryConfig::new(8));
    library.register("patrol", sequence(vec![Tally::boxed(), lazy_include("patrol")]));
    let library = Arc::new(library);

    let mut tree = library.create_tree("patrol").unwrap();
    let mut log = Log::new();
    let err = tree.step(&mut log).unwrap_err();

    assert_eq!(
        err,
        TaskError::IncludeDepthExceeded {
            reference: "patrol".to_string(),
            limit: 8
        }
    );
    assert_eq!(log.len(), 10);
}

#[test]
fn shared_library_serves_many_trees() {
    let mut library = SubtreeLibrary::new();
    library.register("enemy_spotted", sequence(vec![Tally::boxed()]));
    library.register(
        "guard",
        selector(vec![
            condition(|log: &Log| log.len() >= 2),
            include("enemy_spotted"),
        ]),
    );
    let library = Arc::new(library);

    let mut first = library.create_tree("guard").unwrap();
    let mut second = library.create_tree("guard").unwrap();

    let mut log = Log::new();
    first.step(&mut log).unwrap();
    first.step(&mut log).unwrap();
    first.step(&mut log).unwrap();
    assert_eq!(log, vec![1, 2]);

    let mut other = Log::new();
    second.step(&mut other).unwrap();
    assert_eq!(other, vec![1]);
}
