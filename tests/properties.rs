use car_market::CarRecord;
use car_market::sort::{SortField, SortOrder, sort};
use car_market::stats::{Statistics, aggregate};
use proptest::prelude::*;

fn car_strategy() -> impl Strategy<Value = CarRecord> {
    (
        "[A-Za-z]{1,6}",
        prop_oneof!["[A-Za-z0-9]{1,4}", "[0-9]{1,3}"],
        proptest::option::of(1950i64..2030),
        0u32..200_000,
        proptest::option::of(0i64..500_000),
    )
        .prop_map(|(brand, model, year, cents, mileage)| CarRecord {
            id: String::new(),
            brand,
            model,
            year,
            price: f64::from(cents) / 100.0,
            mileage,
        })
}

fn cars_strategy() -> impl Strategy<Value = Vec<CarRecord>> {
    proptest::collection::vec(car_strategy(), 0..24).prop_map(|mut cars| {
        for (i, car) in cars.iter_mut().enumerate() {
            car.id = (i + 1).to_string();
        }
        cars
    })
}

fn field_strategy() -> impl Strategy<Value = SortField> {
    proptest::sample::select(SortField::ALL.to_vec())
}

fn order_strategy() -> impl Strategy<Value = SortOrder> {
    prop_oneof![Just(SortOrder::Ascending), Just(SortOrder::Descending)]
}

/// Stable sort by price, done independently of the engine.
fn reference_price_sort(cars: &[CarRecord]) -> Vec<CarRecord> {
    let mut sorted = cars.to_vec();
    sorted.sort_by(|a, b| a.price.total_cmp(&b.price));
    sorted
}

proptest! {
    #[test]
    fn sort_is_a_permutation(cars in cars_strategy(), field in field_strategy(), order in order_strategy()) {
        let mut before: Vec<String> = cars.iter().map(|c| c.id.clone()).collect();
        let mut after: Vec<String> = sort(&cars, field, order).into_iter().map(|c| c.id).collect();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn price_sort_is_stable(cars in cars_strategy()) {
        prop_assert_eq!(sort(&cars, SortField::Price, SortOrder::Ascending), reference_price_sort(&cars));
    }

    #[test]
    fn descending_reverses_ascending_without_ties(cars in cars_strategy(), field in field_strategy()) {
        let asc = sort(&cars, field, SortOrder::Ascending);
        let desc = sort(&cars, field, SortOrder::Descending);

        let mut reversed_asc = asc.clone();
        reversed_asc.reverse();

        // Every equal-key run is a tie; with none, the two orders mirror each other.
        let ties = asc.windows(2).any(|w| {
            let once = sort(&[w[1].clone(), w[0].clone()], field, SortOrder::Ascending);
            once[0].id == w[1].id
        });
        if !ties {
            prop_assert_eq!(desc, reversed_asc);
        }
    }

    #[test]
    fn statistics_ignore_order(cars in cars_strategy(), field in field_strategy(), order in order_strategy()) {
        prop_assert_eq!(aggregate(&sort(&cars, field, order)), aggregate(&cars));
    }

    #[test]
    fn counts_match_present_values(cars in cars_strategy()) {
        let stats = aggregate(&cars);
        if cars.is_empty() {
            prop_assert_eq!(stats, Statistics::NoData);
        } else {
            prop_assert_eq!(stats.total(), cars.len());
            prop_assert_eq!(stats.price().count, cars.len());
            prop_assert_eq!(stats.year().count, cars.iter().filter(|c| c.year.is_some()).count());
            prop_assert_eq!(stats.mileage().count, cars.iter().filter(|c| c.mileage.is_some()).count());
            let price = stats.price();
            prop_assert!(price.min <= price.avg && price.avg <= price.max);
        }
    }
}
