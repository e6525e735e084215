use fruit_nn::data::synthetic::synthetic_fruits;
use fruit_nn::train::{train_epoch, evaluate};
use fruit_nn::{Dataset, FeatureSet, LossType, Network, NetworkSpec, PlotConfig, Sgd};
use rand::{rngs::StdRng, SeedableRng};

fn main() -> fruit_nn::Result<()> {
    let mut dataset = Dataset::from_categories(synthetic_fruits(15, FeatureSet::RedBlue))?;
    let mut network = Network::seeded(NetworkSpec::fruit_classifier(2), 1)?;

    let mut optimizer = Sgd::new(0.5);
    let mut rng = StdRng::seed_from_u64(1);
    let epochs = 2000;

    for epoch in 0..epochs {
        train_epoch(&mut network, &mut dataset, &mut optimizer, LossType::Mse, &mut rng)?;
        if epoch % 200 == 0 {
            let loss = evaluate(&network, &dataset, LossType::Mse)?;
            println!("Epoch {epoch}: loss = {loss:.6}");
        }
    }

    for (point, name) in [([0.9, 0.1], "apple"), ([0.9, 0.9], "banana"), ([0.1, 0.5], "grape")] {
        let output = network.forward(&point)?;
        let predicted = dataset.class_name(network.predict(&point)?).unwrap_or("?");
        println!("{name:>6} {point:?} -> {predicted} {output:.3?}");
    }

    fruit_nn::plot::save_decision_plot(&network, &dataset, &PlotConfig::default(), "fruits.png")?;
    println!("decision regions written to fruits.png");
    Ok(())
}
