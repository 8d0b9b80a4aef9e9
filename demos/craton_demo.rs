//! Craton seeding with both strategies, then a save/load round trip

use icosphere_planet::geometry::RelaxOptions;
use icosphere_planet::*;

fn main() -> Result<()> {
    let planet = run_mesh(
        Planet::new(6371.0, 3, 7),
        &MeshStage {
            strategy: MeshStrategy::Icosphere,
            relax: RelaxOptions::default(),
        },
    )?;
    println!("{}", planet.summary());

    for strategy in [CratonStrategy::SpacedRandom, CratonStrategy::PairwiseRejection] {
        let config = CratonSeedingConfig {
            strategy,
            ..Default::default()
        };
        let mut rng = planet.rng();
        let seeded = run_cratons(planet.clone(), &config, &mut rng)?;

        println!("\nStrategy {}:", strategy);
        for craton in seeded.cratons() {
            println!("  craton {} at face {}", craton.id, craton.center_index);
        }

        let cratons = seeded.cratons();
        let closest = cratons
            .iter()
            .enumerate()
            .flat_map(|(i, a)| cratons[i + 1..].iter().map(move |b| (a, b)))
            .filter_map(|(a, b)| seeded.graph_distance(a.center_index, b.center_index))
            .min();
        if let Some(hops) = closest {
            println!("  closest pair: {} hops", hops);
        }
    }

    let mut rng = planet.rng();
    let planet = run_cratons(planet, &CratonSeedingConfig::default(), &mut rng)?;

    let path = std::env::temp_dir().join("craton_demo.planetbin");
    planet.save(&path)?;
    let source = load_render_data(&path)?;
    let data = source.render_data()?;
    let buffers = data.flat_buffers(&CratonHighlighter::new(source.planet().cratons()));

    println!(
        "\nReloaded {} and built {} triangles ({} highlighted faces)",
        path.display(),
        buffers.triangle_count(),
        source.planet().cratons().len()
    );
    Ok(())
}
