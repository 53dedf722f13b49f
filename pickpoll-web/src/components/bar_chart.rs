use pickpoll_core::ChartSeries;
use yew::prelude::*;

const BAR_WIDTH: u32 = 22;
const BAR_GAP: u32 = 8;
const LABEL_BAND: u32 = 70;

#[derive(Properties, Clone, PartialEq, Eq)]
pub struct Props {
    pub series: ChartSeries,
    #[prop_or(200)]
    pub plot_height: u32,
}

/// Vertical bar chart drawn as inline SVG, one bar per label.
#[function_component(BarChart)]
pub fn bar_chart(p: &Props) -> Html {
    let max = p.series.scale_max();
    let slot = BAR_WIDTH + BAR_GAP;
    let count = u32::try_from(p.series.values.len()).unwrap_or(u32::MAX);
    let width = count.saturating_mul(slot).max(slot);
    let height = p.plot_height + LABEL_BAND;
    let view_box = format!("0 0 {width} {height}");
    let title_id = format!("chart-{}", p.series.title.to_lowercase());

    let bars = p
        .series
        .labels
        .iter()
        .zip(&p.series.values)
        .zip(0_u32..)
        .map(|((label, value), index)| {
            let bar_height = bar_height(*value, max, p.plot_height);
            let x = index * slot + BAR_GAP / 2;
            let y = p.plot_height - bar_height;
            let label_x = x + BAR_WIDTH / 2;
            let label_y = p.plot_height + 8;
            html! {
                <g key={label.clone()} class="bar">
                    <rect
                        x={x.to_string()}
                        y={y.to_string()}
                        width={BAR_WIDTH.to_string()}
                        height={bar_height.to_string()}
                    >
                        <title>{ format!("{label}: {value}") }</title>
                    </rect>
                    <text
                        x={label_x.to_string()}
                        y={label_y.to_string()}
                        transform={format!("rotate(60 {label_x} {label_y})")}
                    >{ label.clone() }</text>
                </g>
            }
        });

    html! {
        <figure class="bar-chart">
            <figcaption id={title_id.clone()}>{ p.series.title.clone() }</figcaption>
            <svg role="img" aria-labelledby={title_id} viewBox={view_box}>
                { for bars }
            </svg>
        </figure>
    }
}

fn bar_height(value: u32, max: u32, plot_height: u32) -> u32 {
    let scaled = u64::from(value) * u64::from(plot_height) / u64::from(max.max(1));
    u32::try_from(scaled).unwrap_or(plot_height).min(plot_height)
}

#[cfg(test)]
mod tests {
    use super::bar_height;

    #[test]
    fn bars_scale_against_the_tallest_value() {
        assert_eq!(bar_height(0, 5, 200), 0);
        assert_eq!(bar_height(5, 5, 200), 200);
        assert_eq!(bar_height(2, 4, 200), 100);
        assert_eq!(bar_height(9, 0, 200), 200);
    }
}
