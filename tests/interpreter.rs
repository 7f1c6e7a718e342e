use genepool::engines::execution::{Chopper, Copier, Mutator};
use genepool::genes::Opcode;
use genepool::{Gene, GenePool, Pool, Probability, Processor};

fn empty_pool() -> GenePool {
    let pool = GenePool::new();
    pool.initialize(0, Probability::EVEN, 10, Probability::EVEN);
    pool
}

#[test]
fn test_chopping_an_empty_branch_releases_nothing() {
    let pool = empty_pool();
    let bare = Gene::branch(Probability::EVEN, None, None);
    let species_id = bare.species_id();
    pool.put_creature(bare.clone());
    pool.set_temperature(Probability::ALWAYS);
    let mut creature = bare;
    let creatures_before = pool.current_number_of_creatures();
    let species_before = pool.current_number_of_species();

    Chopper::new(&pool, Probability::ALWAYS).chop(&mut creature);

    assert_eq!(creature, Gene::branch(Probability::EVEN, None, None));
    assert_eq!(pool.current_number_of_creatures(), creatures_before);
    assert_eq!(pool.current_number_of_species(), species_before);
    assert_eq!(pool.species_size(species_id), 1);
}

#[test]
fn test_chopping_detaches_child_into_its_own_bucket() {
    let pool = empty_pool();
    pool.set_temperature(Probability::ALWAYS);
    let mut creature = Gene::branch(
        Probability::EVEN,
        Some(Gene::Chop {
            probability: Probability::EVEN,
        }),
        None,
    );
    let chop_bucket = Opcode::Chop.canonical_id();

    Chopper::new(&pool, Probability::ALWAYS).chop(&mut creature);

    assert_eq!(creature, Gene::branch(Probability::EVEN, None, None));
    assert_eq!(pool.current_number_of_creatures(), 1);
    assert_eq!(pool.current_number_of_species(), 1);
    assert_eq!(pool.species_size(chop_bucket), 1);
}

#[test]
fn test_put_in_sequence_returns_stack_item_to_pool() {
    let pool = empty_pool();
    let mut processor = Processor::new(&pool);
    processor.push(Gene::Merge);
    let before = pool.current_number_of_creatures();

    processor.process(&Gene::sequence(vec![Gene::Put]));

    assert_eq!(processor.stack_len(), 0);
    assert_eq!(pool.current_number_of_creatures(), before + 1);
}

#[test]
fn test_get_then_put_round_trips_a_creature() {
    let pool = empty_pool();
    pool.put_creature(Gene::Merge);
    let mut processor = Processor::new(&pool);

    processor.process(&Gene::sequence(vec![Gene::get(Some(Gene::Merge)), Gene::Put]));

    assert_eq!(processor.stack_len(), 0);
    assert_eq!(pool.current_number_of_creatures(), 1);
    assert_eq!(pool.species_size(Gene::Merge.species_id()), 1);
}

#[test]
fn test_get_merge_builds_a_new_species() {
    let pool = empty_pool();
    pool.put_creature(Gene::Put);
    pool.put_creature(Gene::branch(Probability::EVEN, None, None));
    let mut processor = Processor::new(&pool);

    processor.process(&Gene::sequence(vec![
        Gene::get(Some(Gene::Put)),
        Gene::get(Some(Gene::branch(Probability::ALWAYS, None, None))),
        Gene::Merge,
        Gene::Put,
    ]));

    assert_eq!(processor.stack_len(), 0);
    assert_eq!(pool.current_number_of_creatures(), 1);
    let merged = Gene::branch(Probability::EVEN, Some(Gene::Put), None);
    assert_eq!(pool.species_size(merged.species_id()), 1);
}

#[test]
fn test_copy_pushes_clone_above_original() {
    let pool = empty_pool();
    for opcode in Opcode::ALL {
        pool.put_creature(opcode.bare());
        pool.put_creature(opcode.bare());
    }
    pool.set_temperature(Probability::ALWAYS);
    let mut processor = Processor::new(&pool);
    let original = Gene::sequence(vec![Gene::Put]);
    processor.push(original.clone());

    processor.process(&Gene::Copy {
        probability: Probability::ALWAYS,
    });

    assert_eq!(processor.stack(), &[original.clone(), original]);
    assert_eq!(pool.species_size(Opcode::Put.canonical_id()), 1);
}

#[test]
fn test_reset_drains_stack_back_to_pool() {
    let pool = empty_pool();
    {
        let mut processor = Processor::new(&pool);
        processor.push(Gene::Put);
        processor.push(Gene::Merge);
        processor.reset();
        assert_eq!(processor.stack_len(), 0);
        processor.push(Gene::get(None));
    }
    assert_eq!(pool.current_number_of_creatures(), 3);
}

#[test]
fn test_visitors_are_harmless_on_frozen_pool() {
    let pool = empty_pool();
    pool.set_temperature(Probability::NEVER);
    let original = Gene::sequence(vec![
        Gene::branch(Probability::EVEN, Some(Gene::Put), Some(Gene::Merge)),
        Gene::Mutate {
            probability: Probability::EVEN,
        },
    ]);
    let mut creature = original.clone();

    Chopper::new(&pool, Probability::ALWAYS).chop(&mut creature);
    Mutator::new(&pool, Probability::ALWAYS).mutate(&mut creature);
    assert_eq!(creature, original);

    // no fresh instances to build from
    assert!(Copier::new(&pool, Probability::ALWAYS).copy(&creature).is_none());
}
