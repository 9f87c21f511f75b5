// Context-dependent deletion rules over a closed alphabet.
//
// Both rules operate on whole runs of a character, so applying a rule to its
// own output changes nothing.

use tnorm_core::charset::CharSet;

use crate::fst::{EPSILON, StateId, Transition, VectorFst};
use crate::symbols::label_of;
use crate::weight::Weight;

fn copy(fst: &mut VectorFst, from: StateId, c: char, to: StateId) {
    let l = label_of(c);
    fst.add_transition(from, Transition::new(l, l, Weight::one(), to));
}

fn drop_char(fst: &mut VectorFst, from: StateId, c: char, to: StateId) {
    fst.add_transition(from, Transition::new(label_of(c), EPSILON, Weight::one(), to));
}

/// Delete every run of `run` immediately followed by a character of
/// `right_context`. All other characters of `sigma` are copied.
///
/// States: 0 copying, 1 inside a run that is being deleted (must end in the
/// context), 2 inside a run that is kept (must not end in the context).
pub fn delete_before(run: char, right_context: &CharSet, sigma: &CharSet) -> VectorFst {
    let mut fst = VectorFst::new();
    let copying = fst.add_state();
    let deleting = fst.add_state();
    let keeping = fst.add_state();
    fst.set_start(copying);
    fst.set_final(copying, Weight::one());
    fst.set_final(keeping, Weight::one());

    for c in sigma.iter().filter(|&c| c != run) {
        copy(&mut fst, copying, c, copying);
        if right_context.contains(c) {
            copy(&mut fst, deleting, c, copying);
        } else {
            copy(&mut fst, keeping, c, copying);
        }
    }
    drop_char(&mut fst, copying, run, deleting);
    drop_char(&mut fst, deleting, run, deleting);
    copy(&mut fst, copying, run, keeping);
    copy(&mut fst, keeping, run, keeping);
    fst
}

/// Delete every run of `run` immediately preceded by a character of
/// `left_context`. All other characters of `sigma` are copied.
///
/// States: 0 copying, 1 just after a context character (runs are deleted).
pub fn delete_after(run: char, left_context: &CharSet, sigma: &CharSet) -> VectorFst {
    let mut fst = VectorFst::new();
    let copying = fst.add_state();
    let after_context = fst.add_state();
    fst.set_start(copying);
    fst.set_final(copying, Weight::one());
    fst.set_final(after_context, Weight::one());

    for c in sigma.iter().filter(|&c| c != run) {
        let next = if left_context.contains(c) {
            after_context
        } else {
            copying
        };
        copy(&mut fst, copying, c, next);
        copy(&mut fst, after_context, c, next);
    }
    copy(&mut fst, copying, run, copying);
    drop_char(&mut fst, after_context, run, after_context);
    fst
}
