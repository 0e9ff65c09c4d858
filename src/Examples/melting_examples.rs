use crate::Thermodynamics::MeltingPoint::{CrossingStrategy, MeltingPointFinder, stable_phase};
use crate::Thermodynamics::melting_analysis::MeltingAnalysis;
use crate::Thermodynamics::melting_task::MeltingTask;
use crate::Thermodynamics::phase_library::{REFERENCE_SAMPLES, aluminium_liquid, aluminium_solid};
use crate::Thermodynamics::phase_output::{DataFileRenderer, PlotRenderer, TableRenderer};
use crate::Utils::load_from_file::{LoadData, save_melting_task};
use prettytable::{Table, row};
use std::env;

pub fn melting_examples(task: usize) {
    match task {
        0 => {
            // reference aluminium data, interpolated crossing
            let analysis = MeltingAnalysis::aluminium().unwrap();
            let report = analysis.run().unwrap();
            report.render(&TableRenderer::default()).unwrap();
            report.pretty_print();
        }
        1 => {
            // the same data with every crossing strategy
            let analysis = MeltingAnalysis::aluminium().unwrap();
            let mut table = Table::new();
            table.add_row(row!["strategy", "T, K", "G, J/mol"]);
            for strategy in [
                CrossingStrategy::FirstMatch,
                CrossingStrategy::ClosestMatch,
                CrossingStrategy::Interpolated,
            ] {
                let report = analysis
                    .clone()
                    .with_finder(MeltingPointFinder::new(strategy))
                    .run()
                    .unwrap();
                match report.melting_point {
                    Some(point) => table.add_row(row![
                        format!("{:?}", strategy),
                        point.temperature,
                        point.energy
                    ]),
                    None => table.add_row(row![format!("{:?}", strategy), "not found", "-"]),
                };
            }
            let refined = analysis.with_refinement(true).run().unwrap();
            if let Some(point) = refined.melting_point {
                table.add_row(row!["Interpolated + bisection", point.temperature, point.energy]);
            }
            table.printstd();
        }
        2 => {
            // task from file: path from the command line or the reference task saved first
            let file_name = match env::args().nth(1) {
                Some(name) => name,
                None => {
                    let name = "melting_task_Al.json".to_string();
                    let task = MeltingTask::aluminium_reference().unwrap();
                    save_melting_task(&task, &name).unwrap();
                    name
                }
            };
            let task = LoadData::new(file_name).load_melting_task().unwrap();
            let report = task.to_analysis().unwrap().run().unwrap();
            report.pretty_print();
            let renderer = DataFileRenderer::new(format!("gibbs_curves_{}.txt", task.substance));
            report.render(&renderer).unwrap();
            println!("curves saved to {:?}", renderer.path);
        }
        3 => {
            // properties of both phases and the stable one
            let solid = aluminium_solid(REFERENCE_SAMPLES).unwrap();
            let liquid = aluminium_liquid(REFERENCE_SAMPLES).unwrap();
            let mut table = Table::new();
            table.add_row(row!["T, K", "phase", "G", "H", "S", "Cp", "stable"]);
            for t in [298.15, 500.0, 700.0, 900.0, 933.47, 1000.0] {
                let stable = stable_phase(&solid, &liquid, t).unwrap();
                for phase in [&solid, &liquid] {
                    table.add_row(row![
                        t,
                        phase.name,
                        format!("{:.2}", phase.gibbs_at(t).unwrap()),
                        format!("{:.2}", phase.enthalpy_at(t).unwrap()),
                        format!("{:.4}", phase.entropy_at(t).unwrap()),
                        format!("{:.4}", phase.heat_capacity_at(t).unwrap()),
                        if phase.name == stable.name { "*" } else { "" }
                    ]);
                }
            }
            table.printstd();
            for phase in [&solid, &liquid] {
                for jump in phase.boundary_discontinuities().unwrap() {
                    println!(
                        "{}: jump of G at {} K = {:.6} J/mol",
                        phase.name,
                        jump.temperature,
                        jump.jump()
                    );
                }
            }
        }
        4 => {
            // chart of both phases, gnuplot window if asked for on the command line
            let gnuplot = env::args().any(|arg| arg == "gnuplot");
            let report = MeltingAnalysis::aluminium().unwrap().run().unwrap();
            if let Err(e) = report.render(&PlotRenderer::new(gnuplot)) {
                println!("plotting failed: {}", e);
            }
        }
        _ => {
            println!("no such task");
        }
    }
}
