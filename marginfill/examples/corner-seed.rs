use marginfill::{Grid, MarginSettings, NeverCancel, Pixel, Tiling, Wavefront};

fn main() {
    env_logger::init();

    let mut image = Grid::new((24, 8), Pixel::new(0, 0, 0, 0));
    image.set_pixel((2, 2), Pixel::new(255, 64, 0, 255));
    image.set_pixel((20, 5), Pixel::new(0, 128, 255, 255));

    let settings = MarginSettings::new().tiling(Tiling::new(true, false));
    let mut wavefront = Wavefront::new(&image, &settings);

    while !wavefront.is_done() {
        let summary = wavefront.step();
        println!(
            "Iteration {}: filled {}, next frontier {}",
            wavefront.iterations(),
            summary.filled,
            summary.next_frontier
        );
    }

    let report = wavefront.run(&NeverCancel);
    println!("Fill report: {:#?}", report);
}
