use innkeeper::construct::{BookingGenerator, Customer, Keeper, Room};
use innkeeper::datatype::Price;
use innkeeper::order::IdentifierIndex;
use innkeeper::persist::decode;
use innkeeper::{EntityKind, InnkeeperError, Keepsake};

fn customer(id: u32) -> Customer {
    Customer::new(
        id,
        format!("Guest {}", id),
        format!("guest{}@email.com", id),
        "5550100".to_string(),
    )
}

fn keeper_of(ids: &[u32]) -> Keeper<Customer> {
    let mut keeper = Keeper::new();
    for id in ids {
        keeper.add(customer(*id)).unwrap();
    }
    keeper
}

fn ids(keeper: &Keeper<Customer>) -> Vec<u32> {
    keeper.all().map(|c| c.id()).collect()
}

#[test]
fn listing_is_ordered_whatever_the_insertion_order() {
    assert_eq!(ids(&keeper_of(&[1, 2, 3, 4])), vec![1, 2, 3, 4]);
    assert_eq!(ids(&keeper_of(&[4, 3, 2, 1])), vec![1, 2, 3, 4]);
    assert_eq!(ids(&keeper_of(&[3, 1, 4, 2])), vec![1, 2, 3, 4]);
    assert_eq!(ids(&keeper_of(&[7])), vec![7]);
    assert!(ids(&keeper_of(&[])).is_empty());
}

#[test]
fn listing_can_be_restarted() {
    let keeper = keeper_of(&[5, 2, 9]);
    let mut first = keeper.all();
    assert_eq!(first.len(), 3);
    assert_eq!(first.next().map(|c| c.id()), Some(2));
    drop(first);
    assert_eq!(ids(&keeper), vec![2, 5, 9]);
    assert_eq!(ids(&keeper), vec![2, 5, 9]);
}

#[test]
fn duplicate_identifiers_are_rejected() {
    let mut keeper = keeper_of(&[1, 2]);
    let err = keeper.add(customer(2)).unwrap_err();
    assert!(matches!(
        err,
        InnkeeperError::DuplicateId { kind: EntityKind::Customer, id: 2 }
    ));
    assert_eq!(keeper.len(), 2);
}

#[test]
fn lookups_follow_mutations() {
    let mut keeper = keeper_of(&[10, 30, 20]);
    assert_eq!(keeper.find(20).map(|c| c.name()), Some("Guest 20"));
    assert!(keeper.find(25).is_none());
    keeper.add(customer(25)).unwrap();
    assert!(keeper.find(25).is_some());
    let deleted = keeper.delete(10).expect("deleted");
    assert_eq!(deleted.id(), 10);
    assert!(keeper.find(10).is_none());
    assert!(keeper.delete(10).is_none());
    assert_eq!(ids(&keeper), vec![20, 25, 30]);
}

#[test]
fn update_changes_fields_in_place() {
    let mut keeper = keeper_of(&[1, 2]);
    keeper
        .update(2, |c| c.set_email("new@email.com".to_string()))
        .unwrap();
    assert_eq!(keeper.find(2).unwrap().email(), "new@email.com");
    let err = keeper.update(3, |c| c.set_name("nobody".to_string())).unwrap_err();
    assert!(matches!(
        err,
        InnkeeperError::NotFound { kind: EntityKind::Customer, id: 3 }
    ));
}

#[test]
fn rooms_are_kept_the_same_way() {
    let mut keeper = Keeper::new();
    for id in [102, 101] {
        keeper
            .add(Room::new(id, "Single".to_string(), Price::try_from(900).unwrap()))
            .unwrap();
    }
    assert!(matches!(
        keeper.add(Room::new(101, "Suite".to_string(), Price::try_from(1).unwrap())),
        Err(InnkeeperError::DuplicateId { kind: EntityKind::Room, id: 101 })
    ));
    keeper
        .update(101, |r| r.set_price("950.25".parse().unwrap()))
        .unwrap();
    assert_eq!(keeper.find(101).unwrap().price().to_string(), "950.25");
}

#[test]
fn index_is_rebuilt_only_when_stale() {
    let items = vec![30, 10, 20];
    let index = IdentifierIndex::new();
    index.invalidate();
    assert!(index.is_stale());
    assert_eq!(&*index.ordered(&items, |x| *x), &[1, 2, 0]);
    assert!(!index.is_stale());
    assert_eq!(index.position(&items, &20, |x| *x), Some(2));
    assert_eq!(index.position(&items, &40, |x| *x), None);
}

#[test]
fn adding_slots_into_a_fresh_index() {
    let mut items = vec![30, 10];
    let index = IdentifierIndex::new();
    index.invalidate();
    assert_eq!(index.search(&items, &20, |x| *x), Err(1));
    assert!(!index.is_stale());
    items.push(20);
    index.insert(1, 2);
    assert!(!index.is_stale());
    assert_eq!(&*index.ordered(&items, |x| *x), &[1, 2, 0]);
    assert_eq!(index.search(&items, &30, |x| *x), Ok(0));
}

#[test]
fn adds_keep_the_index_fresh() {
    let mut keeper = Keeper::new();
    for id in (1..=20_000).rev() {
        keeper.add(customer(id)).unwrap();
    }
    assert_eq!(keeper.len(), 20_000);
    assert_eq!(keeper.all().next().map(|c| c.id()), Some(1));
    assert_eq!(keeper.find(12_345).map(|c| c.id()), Some(12_345));
}

#[test]
fn large_unsorted_files_decode_in_order() {
    let mut text = String::from("id,type,price,isBooked\n");
    for id in (1..=50_000u32).rev() {
        text.push_str(&format!("{},Double,{},false\n", id, 900 + id % 300));
    }
    text.push_str("777,Suite,5000,false\n");
    let decoded = decode::<Room>(&text);
    assert_eq!(decoded.kept.len(), 50_000);
    assert_eq!(decoded.malformed.len(), 1);
    assert_eq!(decoded.malformed[0].line, 50_002);
    assert_eq!(decoded.kept.find(777).unwrap().room_type(), "Double");
    let ids: Vec<u32> = decoded.kept.all().map(|r| r.id()).take(3).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn booking_identifiers_run_out_without_overflowing() {
    let mut generator = BookingGenerator::new();
    assert_eq!(generator.peek(), Some(1));
    assert_eq!(generator.generate().unwrap(), 1);
    generator.retain(u32::MAX - 1);
    assert_eq!(generator.generate().unwrap(), u32::MAX);
    assert_eq!(generator.peek(), None);
    assert!(matches!(generator.generate(), Err(InnkeeperError::IdentifiersExhausted)));
    assert_eq!(generator.peek(), None);
}

#[test]
fn index_sort_is_stable() {
    let items = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')];
    let index = IdentifierIndex::new();
    index.invalidate();
    let order: Vec<char> = index
        .ordered(&items, |x| x.0)
        .iter()
        .map(|&p| items[p].1)
        .collect();
    assert_eq!(order, vec!['b', 'd', 'a', 'c']);
}

#[test]
fn prices_must_be_positive() {
    assert!(matches!(Price::try_from(0), Err(InnkeeperError::InvalidPrice(_))));
    assert!(matches!("-1".parse::<Price>(), Err(InnkeeperError::InvalidPrice(_))));
    assert!(matches!("cheap".parse::<Price>(), Err(InnkeeperError::InvalidPrice(_))));
    assert_eq!("1200".parse::<Price>().unwrap().times(2).to_string(), "2400");
}
